#![allow(dead_code, reason = "Each test binary uses a different subset of helpers")]

use anyhow::Result;
use dom::{
    DOMSubscriber, DOMUpdate, DocumentMetrics, MemoryDocument, NodeKey, Rect, ScrollOffset,
    VerticalMargins,
};
use sticky_sidebar::StickySidebar;

pub const HTML: NodeKey = NodeKey(1);
pub const BODY: NodeKey = NodeKey(2);
pub const HEADER: NodeKey = NodeKey(3);
pub const CONTENT: NodeKey = NodeKey(4);
pub const SIDEBAR: NodeKey = NodeKey(5);
pub const FOOTER: NodeKey = NodeKey(6);

pub const ORIGINAL_STYLE: &str = "position: relative; width: 100%";

pub fn init_logging() {
    let _logger = env_logger::builder().is_test(true).try_init();
}

fn element(parent: NodeKey, node: NodeKey, tag: &str) -> DOMUpdate {
    DOMUpdate::InsertElement {
        parent,
        node,
        tag: tag.to_owned(),
        pos: usize::MAX,
    }
}

fn attr(node: NodeKey, name: &str, value: &str) -> DOMUpdate {
    DOMUpdate::SetAttr {
        node,
        name: name.to_owned(),
        value: value.to_owned(),
    }
}

fn layout(node: NodeKey, rect: Rect) -> DOMUpdate {
    DOMUpdate::SetLayout {
        node,
        rect,
        client_height: rect.height,
    }
}

/// A 3000px page: 40px header box, a 250px wide container at y=300 holding
/// a 600px sidebar, a footer, and a 1024px viewport scrolled to the top.
pub fn page() -> Result<MemoryDocument> {
    init_logging();
    let mut doc = MemoryDocument::new();
    doc.apply_all([
        element(NodeKey::ROOT, HTML, "html"),
        element(HTML, BODY, "body"),
        element(BODY, HEADER, "header"),
        attr(HEADER, "id", "header"),
        layout(HEADER, Rect::new(0.0, 0.0, 1024.0, 30.0)),
        DOMUpdate::SetMargins {
            node: HEADER,
            margins: VerticalMargins {
                top: 5.0,
                bottom: 5.0,
            },
        },
        element(BODY, CONTENT, "div"),
        attr(CONTENT, "class", "content"),
        layout(CONTENT, Rect::new(100.0, 300.0, 250.0, 2000.0)),
        element(CONTENT, SIDEBAR, "aside"),
        attr(SIDEBAR, "id", "sidebar"),
        attr(SIDEBAR, "style", ORIGINAL_STYLE),
        layout(SIDEBAR, Rect::new(100.0, 300.0, 250.0, 600.0)),
        element(BODY, FOOTER, "footer"),
        attr(FOOTER, "id", "footer"),
        layout(FOOTER, Rect::new(0.0, 2950.0, 1024.0, 50.0)),
        DOMUpdate::SetViewport {
            width: 1024.0,
            height: 768.0,
        },
        DOMUpdate::SetDocumentMetrics {
            metrics: DocumentMetrics::uniform(3000.0),
        },
    ])?;
    Ok(doc)
}

pub fn scroll_to(sidebar: &mut StickySidebar<MemoryDocument>, y: f64) -> Result<()> {
    sidebar.document_mut().apply_update(DOMUpdate::SetScroll {
        offset: ScrollOffset { x: 0.0, y },
    })?;
    sidebar.on_scroll();
    Ok(())
}

pub fn resize_to(sidebar: &mut StickySidebar<MemoryDocument>, width: f64) -> Result<()> {
    sidebar.document_mut().apply_update(DOMUpdate::SetViewport {
        width,
        height: 768.0,
    })?;
    sidebar.on_resize();
    Ok(())
}

pub fn style_of(sidebar: &StickySidebar<MemoryDocument>) -> String {
    use dom::HostDocument as _;
    sidebar.document().inline_style(SIDEBAR).css_text()
}

pub fn style_value(sidebar: &StickySidebar<MemoryDocument>, name: &str) -> Option<String> {
    use dom::HostDocument as _;
    sidebar
        .document()
        .inline_style(SIDEBAR)
        .get(name)
        .map(str::to_owned)
}
