//! Static HTML table for the current run's batch.
//!
//! The page also polls the feed file every 60 s and rebuilds the table from
//! each item's `title` (split on the first `": "`) and `pubDate`.

use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fmt::Write as _;

use crate::ingest::types::DisclosurePost;

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>RansomWatch</title>
    <style>
        body { font-family: Arial, sans-serif; margin: 0; padding: 20px; }
        table { border-collapse: collapse; width: 100%; }
        th, td { border: 1px solid #ddd; padding: 8px; text-align: left; }
        th { background-color: #f2f2f2; }
    </style>
    <script>
        function localizeTimes(root) {
            root.querySelectorAll('time[datetime]').forEach(el => {
                const d = new Date(el.getAttribute('datetime'));
                if (!isNaN(d)) el.textContent = d.toLocaleString();
            });
        }

        function refreshContent() {
            fetch('feed.xml', { cache: 'no-store' })
                .then(response => response.text())
                .then(str => new window.DOMParser().parseFromString(str, 'text/xml'))
                .then(data => {
                    const items = data.querySelectorAll('item');
                    if (items.length === 0) return;
                    const tableBody = document.querySelector('tbody');
                    tableBody.textContent = '';
                    items.forEach(item => {
                        const title = item.querySelector('title')?.textContent ?? '';
                        const pubDate = item.querySelector('pubDate')?.textContent ?? '';
                        const sep = title.indexOf(': ');
                        const groupName = sep >= 0 ? title.slice(0, sep) : title;
                        const postTitle = sep >= 0 ? title.slice(sep + 2) : '';
                        const when = new Date(pubDate);
                        const row = document.createElement('tr');
                        [groupName, postTitle, isNaN(when) ? pubDate : when.toLocaleString()]
                            .forEach(text => {
                                const cell = document.createElement('td');
                                cell.textContent = text;
                                row.appendChild(cell);
                            });
                        tableBody.appendChild(row);
                    });
                })
                .catch(err => console.error('feed refresh failed', err));
        }

        // Refresh content every 60 seconds
        setInterval(refreshContent, 60000);

        // Rows start as this run's batch; the feed replaces them on the first tick.
        document.addEventListener('DOMContentLoaded', () => localizeTimes(document));
    </script>
</head>
<body>
    <h1>RansomWatch</h1>
    <table>
        <thead>
            <tr>
                <th>Group Name</th>
                <th>Post Title</th>
                <th>Discovered</th>
            </tr>
        </thead>
        <tbody>
"#;

const PAGE_TAIL: &str = r#"        </tbody>
    </table>
</body>
</html>
"#;

fn render_row(out: &mut String, p: &DisclosurePost) {
    let iso = p.discovered.to_rfc3339();
    let fallback = p.discovered.format("%Y-%m-%d %H:%M UTC").to_string();
    let _ = write!(
        out,
        "            <tr>\n                <td>{}</td>\n                <td>{}</td>\n                <td><time datetime=\"{}\">{}</time></td>\n            </tr>\n",
        encode_text(&p.group_name),
        encode_text(&p.post_title),
        encode_double_quoted_attribute(&iso),
        encode_text(&fallback),
    );
}

/// Render the batch as a complete HTML document.
pub fn render_html(posts: &[DisclosurePost]) -> String {
    let mut out = String::with_capacity(PAGE_HEAD.len() + PAGE_TAIL.len() + posts.len() * 160);
    out.push_str(PAGE_HEAD);
    for p in posts {
        render_row(&mut out, p);
    }
    out.push_str(PAGE_TAIL);
    out
}
