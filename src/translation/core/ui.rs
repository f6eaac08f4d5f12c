//! Page widgets touched while a language change runs
//!
//! - `.translation-progress` container with a `.progress-bar` and the
//!   `#translation-status` line
//! - the `#languageModal` dialog holding `.language-btn[data-lang]` buttons
//!
//! Every widget is optional; a page without them is translated all the same.

use markup5ever_rcdom::Handle;

use crate::parsers::html::{
    add_class, find_element_by_id, find_elements_by_class, get_node_attr, has_class,
    remove_class, set_node_attr, set_text_content,
};
use crate::translation::config::constants;
use crate::translation::language::LanguageCode;

/// Percentage shown for `processed` of `total` units, capped at 100
pub fn progress_percent(processed: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let percent = (processed as f64 / total as f64 * 100.0).round();
    percent.min(100.0) as u8
}

/// 翻译进度条
#[derive(Debug, Clone, Default)]
pub struct ProgressIndicator {
    container: Option<Handle>,
    bar: Option<Handle>,
    status: Option<Handle>,
}

impl ProgressIndicator {
    pub fn find(root: &Handle) -> Self {
        let container = find_elements_by_class(root, constants::PROGRESS_CONTAINER_CLASS)
            .into_iter()
            .next();
        let bar = container.as_ref().and_then(|container| {
            find_elements_by_class(container, constants::PROGRESS_BAR_CLASS)
                .into_iter()
                .next()
        });
        let status = find_element_by_id(root, constants::STATUS_ELEMENT_ID);

        Self {
            container,
            bar,
            status,
        }
    }

    pub fn start(&self, target: &LanguageCode) {
        if let Some(container) = &self.container {
            remove_class(container, constants::HIDDEN_CLASS);
        }
        self.set_width(0);
        self.set_status(&format!("Translation in progress ({})...", target));
    }

    /// Updates the bar and status text, returning the percentage shown
    pub fn update(&self, processed: usize, total: usize) -> u8 {
        let percent = progress_percent(processed, total);
        self.set_width(percent);
        self.set_status(&format!("Translation in progress: {}%", percent));
        percent
    }

    pub fn finish(&self) {
        if let Some(container) = &self.container {
            add_class(container, constants::HIDDEN_CLASS);
        }
        self.set_width(0);
    }

    fn set_width(&self, percent: u8) {
        if let Some(bar) = &self.bar {
            set_node_attr(bar, "style", Some(format!("width: {}%", percent)));
        }
    }

    fn set_status(&self, text: &str) {
        if let Some(status) = &self.status {
            set_text_content(status, text);
        }
    }
}

/// 语言选择对话框
#[derive(Debug, Clone, Default)]
pub struct LanguageSelector {
    modal: Option<Handle>,
    buttons: Vec<Handle>,
}

impl LanguageSelector {
    pub fn find(root: &Handle) -> Self {
        let buttons = find_elements_by_class(root, constants::LANGUAGE_BUTTON_CLASS)
            .into_iter()
            .filter(|button| get_node_attr(button, constants::LANGUAGE_ATTR).is_some())
            .collect();

        Self {
            modal: find_element_by_id(root, constants::LANGUAGE_MODAL_ID),
            buttons,
        }
    }

    /// Language carried by a selector control
    pub fn language_of(control: &Handle) -> Option<String> {
        get_node_attr(control, constants::LANGUAGE_ATTR).filter(|lang| !lang.trim().is_empty())
    }

    /// Marks exactly the buttons for `language` as active
    pub fn mark_active(&self, language: &LanguageCode) {
        for button in &self.buttons {
            let is_target = Self::language_of(button)
                .is_some_and(|lang| LanguageCode::new(&lang) == *language);

            if is_target {
                add_class(button, constants::ACTIVE_CLASS);
            } else if has_class(button, constants::ACTIVE_CLASS) {
                remove_class(button, constants::ACTIVE_CLASS);
            }
        }
    }

    /// Hides the modal the way Bootstrap leaves a dismissed dialog
    pub fn close(&self) {
        if let Some(modal) = &self.modal {
            remove_class(modal, "show");
            set_node_attr(modal, "aria-hidden", Some("true".to_string()));
            set_node_attr(modal, "style", Some("display: none;".to_string()));
        }
    }

    pub fn buttons(&self) -> &[Handle] {
        &self.buttons
    }
}
