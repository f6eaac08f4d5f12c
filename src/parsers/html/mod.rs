//! HTML解析和处理模块
//!
//! - `utils`: 基础工具函数和常量
//! - `dom`: 基础DOM操作（属性、类名、文本内容）
//! - `serializer`: 序列化功能

pub mod dom;
pub mod serializer;
pub mod utils;

pub use dom::{
    add_class, find_element_by_id, find_elements, find_elements_by_class, get_node_attr,
    get_node_name, get_text_content, has_class, html_to_dom, remove_class, set_node_attr,
    set_text_content, walk_elements,
};
pub use serializer::serialize_document;
pub use utils::{is_blank, is_non_content_element, NON_CONTENT_ELEMENTS, WHITESPACES};
