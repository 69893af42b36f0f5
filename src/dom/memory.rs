//! In-memory [`DomNode`] tree used by unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::DomNode;
use crate::errors::{ExtractError, Result};
use crate::models::{ComputedStyle, NodeSnapshot, RawRect};

#[derive(Debug, Clone, Default)]
pub(crate) struct MemoryNode {
    pub snapshot: NodeSnapshot,
    pub children: Vec<MemoryNode>,
    pub inner_html: String,
    pub markup: String,
    pub capture: Vec<u8>,
    pub fail_capture: bool,
    /// Browser calls with side effects, in call order. Clones share one log, like elements of
    /// one page. Those calls yield to the scheduler so concurrent callers can interleave.
    pub calls: Arc<Mutex<Vec<String>>>,
}

fn base_style() -> ComputedStyle {
    ComputedStyle {
        color: "rgb(0, 0, 0)".to_string(),
        background_color: "rgba(0, 0, 0, 0)".to_string(),
        background_image: "none".to_string(),
        border_color: "rgb(0, 0, 0)".to_string(),
        border_width: "0px".to_string(),
        border_radius: "0px".to_string(),
        box_shadow: "none".to_string(),
        filter: "none".to_string(),
        font_family: "Arial".to_string(),
        font_size: "16px".to_string(),
        font_weight: "400".to_string(),
        font_style: "normal".to_string(),
        line_height: "normal".to_string(),
        margin_top: "0px".to_string(),
        margin_bottom: "0px".to_string(),
        margin_left: "0px".to_string(),
        margin_right: "0px".to_string(),
        padding_top: "0px".to_string(),
        padding_bottom: "0px".to_string(),
        padding_left: "0px".to_string(),
        padding_right: "0px".to_string(),
        z_index: "auto".to_string(),
        text_align: "start".to_string(),
        object_fit: "fill".to_string(),
        white_space: "normal".to_string(),
        opacity: "1".to_string(),
    }
}

impl MemoryNode {
    pub fn element(tag: &str, left: f64, top: f64, width: f64, height: f64) -> Self {
        MemoryNode {
            snapshot: NodeSnapshot {
                tag_name: tag.to_string(),
                rect: RawRect {
                    left: Some(left),
                    top: Some(top),
                    width: Some(width),
                    height: Some(height),
                },
                has_only_text_nodes: true,
                offset_height: height,
                client_height: height,
                scroll_height: height,
                style: base_style(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn style(mut self, edit: impl FnOnce(&mut ComputedStyle)) -> Self {
        edit(&mut self.snapshot.style);
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.snapshot.text_content = Some(text.to_string());
        self
    }

    pub fn html(mut self, html: &str) -> Self {
        self.inner_html = html.to_string();
        self
    }

    pub fn child(mut self, child: MemoryNode) -> Self {
        self.snapshot.has_only_text_nodes = false;
        self.children.push(child);
        self
    }

    fn push_call(&self, call: &str) {
        self.calls
            .lock()
            .expect("call log lock poisoned")
            .push(call.to_string());
    }

    pub fn recorded_calls(&self) -> Vec<String> {
        self.calls.lock().expect("call log lock poisoned").clone()
    }

    fn collect_tags(&self, tags: &mut Vec<String>) {
        for child in &self.children {
            tags.push(child.snapshot.tag_name.to_lowercase());
            child.collect_tags(tags);
        }
    }
}

#[async_trait]
impl DomNode for MemoryNode {
    async fn snapshot(&self) -> Result<NodeSnapshot> {
        Ok(self.snapshot.clone())
    }

    async fn children(&self) -> Result<Vec<Self>> {
        Ok(self.children.clone())
    }

    async fn descendant_tag_names(&self) -> Result<Vec<String>> {
        let mut tags = Vec::new();
        self.collect_tags(&mut tags);
        Ok(tags)
    }

    async fn inner_html(&self) -> Result<String> {
        Ok(self.inner_html.clone())
    }

    async fn svg_markup(&self) -> Result<String> {
        Ok(self.markup.clone())
    }

    async fn isolate(&self) -> Result<()> {
        self.push_call("isolate");
        tokio::task::yield_now().await;
        Ok(())
    }

    async fn restore_isolation(&self) -> Result<()> {
        self.push_call("restore");
        Ok(())
    }

    async fn screenshot_png(&self) -> Result<Vec<u8>> {
        self.push_call("screenshot");
        tokio::task::yield_now().await;
        if self.fail_capture {
            return Err(ExtractError::MissingScriptValue(
                "capture failed".to_string(),
            ));
        }
        Ok(self.capture.clone())
    }
}
