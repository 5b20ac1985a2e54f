//! Page element lookup and label/panel projection

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, HtmlButtonElement, HtmlCanvasElement, HtmlElement, HtmlInputElement,
    HtmlTextAreaElement,
};

use crate::canvas::resolve_canvas;

fn cast_element<T>(document: &Document, id: &str) -> Result<T, JsValue>
where
    T: JsCast,
{
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("element '{}' not found", id)))?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("failed to cast element '{}'", id)))
}

/// Every element the widget touches
pub struct Refs {
    pub document: Document,
    pub tab_number: HtmlButtonElement,
    pub tab_text: HtmlButtonElement,
    pub panel_number: HtmlElement,
    pub panel_text: HtmlElement,
    pub min_input: HtmlInputElement,
    pub max_input: HtmlInputElement,
    pub apply_range: HtmlButtonElement,
    pub reset_number: HtmlButtonElement,
    pub number_error: HtmlElement,
    pub text_options: HtmlTextAreaElement,
    pub apply_options: HtmlButtonElement,
    pub reset_scratch: HtmlButtonElement,
    pub clear_text: HtmlButtonElement,
    pub text_error: HtmlElement,
    pub wheel_section: HtmlElement,
    pub wheel_focus: HtmlElement,
    pub wheel_canvas: HtmlCanvasElement,
    pub scratch_section: HtmlElement,
    pub scratch_canvas: HtmlCanvasElement,
    pub scratch_result: HtmlElement,
    pub status_row: HtmlElement,
    pub status: HtmlElement,
    pub result: HtmlElement,
    pub history_panel: HtmlElement,
    pub removed_list: HtmlElement,
}

impl Refs {
    pub fn resolve(document: &Document) -> Result<Self, JsValue> {
        Ok(Self {
            document: document.clone(),
            tab_number: cast_element(document, "tab-number")?,
            tab_text: cast_element(document, "tab-text")?,
            panel_number: cast_element(document, "panel-number")?,
            panel_text: cast_element(document, "panel-text")?,
            min_input: cast_element(document, "number-min")?,
            max_input: cast_element(document, "number-max")?,
            apply_range: cast_element(document, "apply-range")?,
            reset_number: cast_element(document, "reset-number-mode")?,
            number_error: cast_element(document, "number-error")?,
            text_options: cast_element(document, "text-options")?,
            apply_options: cast_element(document, "apply-options")?,
            reset_scratch: cast_element(document, "reset-scratch")?,
            clear_text: cast_element(document, "clear-text-options")?,
            text_error: cast_element(document, "text-error")?,
            wheel_section: cast_element(document, "wheel-section")?,
            wheel_focus: cast_element(document, "wheel-focus")?,
            wheel_canvas: resolve_canvas(document, "wheel")?,
            scratch_section: cast_element(document, "scratch-section")?,
            scratch_canvas: resolve_canvas(document, "scratch-canvas")?,
            scratch_result: cast_element(document, "scratch-result")?,
            status_row: cast_element(document, "status-row")?,
            status: cast_element(document, "spin-status")?,
            result: cast_element(document, "spin-result")?,
            history_panel: cast_element(document, "history-panel")?,
            removed_list: cast_element(document, "removed-list")?,
        })
    }

    /// Toggle tabs and panels for the active game
    pub fn show_mode(&self, is_number: bool) -> Result<(), JsValue> {
        for (tab, active) in [(&self.tab_number, is_number), (&self.tab_text, !is_number)] {
            tab.class_list().toggle_with_force("active", active)?;
            tab.set_attribute("aria-pressed", if active { "true" } else { "false" })?;
        }
        for (panel, active) in [(&self.panel_number, is_number), (&self.panel_text, !is_number)] {
            panel.class_list().toggle_with_force("active", active)?;
            panel.set_hidden(!active);
        }

        self.history_panel.set_hidden(!is_number);
        self.wheel_section.set_hidden(!is_number);
        self.scratch_section.set_hidden(is_number);
        self.status_row.set_hidden(!is_number);
        Ok(())
    }

    /// Rebuild the removed-numbers list
    pub fn render_history(&self, lines: &[String]) -> Result<(), JsValue> {
        self.removed_list.set_inner_html("");
        for line in lines {
            let li = self.document.create_element("li")?;
            li.set_text_content(Some(line));
            self.removed_list.append_child(&li)?;
        }
        Ok(())
    }
}
