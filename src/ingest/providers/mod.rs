pub mod ransomwhat;
