//! Generation core for the quill static blog builder.

pub mod abstracts;
pub mod body;
pub mod build;
pub mod config;
pub mod error;
pub mod extract;
pub mod feeds;
pub mod header;
pub mod html;
pub mod index;
pub mod model;
pub mod nav_tree;
pub mod output;
pub mod pages;
pub mod paths;
pub mod position;
pub mod render;
pub mod report;
pub mod templates;
pub mod toc;
