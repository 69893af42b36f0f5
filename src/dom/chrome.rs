//! [`DomNode`] for `chromiumoxide` element handles.
//!
//! Every browser-side function returns `JSON.stringify(...)`, so results always come back as a
//! string primitive regardless of how the protocol serializes remote objects.

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::element::Element;
use serde::de::DeserializeOwned;

use super::DomNode;
use crate::errors::{ExtractError, Result};
use crate::models::NodeSnapshot;

const SNAPSHOT_JS: &str = r#"function () {
    const el = this;
    const cs = window.getComputedStyle(el);
    const rect = el.getBoundingClientRect();
    const num = (value) => (Number.isFinite(value) ? value : null);
    let hasOnlyTextNodes = true;
    for (const child of el.childNodes) {
        if (child.nodeType === Node.ELEMENT_NODE) {
            hasOnlyTextNodes = false;
            break;
        }
    }
    return JSON.stringify({
        tagName: el.tagName.toLowerCase(),
        id: el.id || null,
        className: el.getAttribute("class"),
        rect: { left: num(rect.left), top: num(rect.top), width: num(rect.width), height: num(rect.height) },
        textContent: el.textContent,
        hasOnlyTextNodes: hasOnlyTextNodes,
        src: typeof el.src === "string" ? el.src : null,
        offsetHeight: el.offsetHeight || 0,
        scrollHeight: el.scrollHeight || 0,
        clientHeight: el.clientHeight || 0,
        style: {
            color: cs.color,
            backgroundColor: cs.backgroundColor,
            backgroundImage: cs.backgroundImage,
            borderColor: cs.borderColor,
            borderWidth: cs.borderWidth,
            borderRadius: cs.borderRadius,
            boxShadow: cs.boxShadow,
            filter: cs.filter,
            fontFamily: cs.fontFamily,
            fontSize: cs.fontSize,
            fontWeight: cs.fontWeight,
            fontStyle: cs.fontStyle,
            lineHeight: cs.lineHeight,
            marginTop: cs.marginTop,
            marginBottom: cs.marginBottom,
            marginLeft: cs.marginLeft,
            marginRight: cs.marginRight,
            paddingTop: cs.paddingTop,
            paddingBottom: cs.paddingBottom,
            paddingLeft: cs.paddingLeft,
            paddingRight: cs.paddingRight,
            zIndex: cs.zIndex,
            textAlign: cs.textAlign,
            objectFit: cs.objectFit,
            whiteSpace: cs.whiteSpace,
            opacity: cs.opacity,
        },
    });
}"#;

const DESCENDANT_TAGS_JS: &str = r#"function () {
    return JSON.stringify(Array.from(this.querySelectorAll("*")).map((e) => e.tagName.toLowerCase()));
}"#;

const SVG_MARKUP_JS: &str = r#"function () {
    this.style.color = window.getComputedStyle(this).color;
    const rect = this.getBoundingClientRect();
    const clone = this.cloneNode(true);
    if (!clone.getAttribute("xmlns")) clone.setAttribute("xmlns", "http://www.w3.org/2000/svg");
    if (!clone.getAttribute("width")) clone.setAttribute("width", String(rect.width));
    if (!clone.getAttribute("height")) clone.setAttribute("height", String(rect.height));
    return JSON.stringify(clone.outerHTML);
}"#;

const ISOLATE_JS: &str = r#"function () {
    const target = this;
    const saved = [];
    document.querySelectorAll("*").forEach((elem) => {
        saved.push([elem, elem.style.opacity]);
        if (elem === target || target.contains(elem) || elem.contains(target)) {
            elem.style.opacity = window.getComputedStyle(elem).opacity || "1";
        } else {
            elem.style.opacity = "0";
        }
    });
    target.__restoreOpacity = () => {
        saved.forEach(([elem, opacity]) => {
            elem.style.opacity = opacity;
        });
        delete target.__restoreOpacity;
    };
    return JSON.stringify(saved.length);
}"#;

const RESTORE_JS: &str = r#"function () {
    if (typeof this.__restoreOpacity === "function") {
        this.__restoreOpacity();
        return JSON.stringify(true);
    }
    return JSON.stringify(false);
}"#;

/// Runs `function` with the element bound to `this` and decodes its JSON string result.
pub(crate) async fn eval_json<T: DeserializeOwned>(element: &Element, function: &str) -> Result<T> {
    let returns = element.call_js_fn(function, false).await?;
    if let Some(details) = returns.exception_details {
        return Err(ExtractError::MissingScriptValue(format!(
            "script threw: {}",
            details.text
        )));
    }
    let raw = returns
        .result
        .value
        .as_ref()
        .and_then(|value| value.as_str())
        .ok_or_else(|| {
            ExtractError::MissingScriptValue("expected a JSON string from the page".to_string())
        })?;
    Ok(serde_json::from_str(raw)?)
}

#[async_trait]
impl DomNode for Element {
    async fn snapshot(&self) -> Result<NodeSnapshot> {
        eval_json(self, SNAPSHOT_JS).await
    }

    async fn children(&self) -> Result<Vec<Self>> {
        Ok(self.find_elements(":scope > *").await?)
    }

    async fn descendant_tag_names(&self) -> Result<Vec<String>> {
        eval_json(self, DESCENDANT_TAGS_JS).await
    }

    async fn inner_html(&self) -> Result<String> {
        Ok(Element::inner_html(self).await?.unwrap_or_default())
    }

    async fn svg_markup(&self) -> Result<String> {
        eval_json(self, SVG_MARKUP_JS).await
    }

    async fn isolate(&self) -> Result<()> {
        let touched: usize = eval_json(self, ISOLATE_JS).await?;
        log::debug!("Isolated element for capture, {} elements adjusted", touched);
        Ok(())
    }

    async fn restore_isolation(&self) -> Result<()> {
        let restored: bool = eval_json(self, RESTORE_JS).await?;
        if !restored {
            log::warn!("Restore requested for an element that was not isolated");
        }
        Ok(())
    }

    async fn screenshot_png(&self) -> Result<Vec<u8>> {
        Ok(Element::screenshot(self, CaptureScreenshotFormat::Png).await?)
    }
}
