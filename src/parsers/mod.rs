//! # 解析器模块
//!
//! HTML解析和DOM操作。翻译管道通过这里读取和修改翻页书的页面。

pub mod html;

pub use html::{html_to_dom, serialize_document};
