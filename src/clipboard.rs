// src/clipboard.rs
//
// Best-effort clipboard. Losing the clipboard copy only downgrades the
// hand-off, so every failure here is reported and then shrugged off upstream.

use crate::error::HarvestError;

pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), HarvestError>;
}

/// The desktop clipboard. The handle is opened on first use and kept for the
/// life of the value: on X11 and Wayland the copied text is served by this
/// process, so it must outlive the write.
#[derive(Default)]
pub struct SystemClipboard {
    handle: Option<arboard::Clipboard>,
}

fn clipboard_err(e: arboard::Error) -> HarvestError {
    HarvestError::Clipboard(e.to_string())
}

impl Clipboard for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), HarvestError> {
        let handle = match self.handle.take() {
            Some(h) => h,
            None => arboard::Clipboard::new().map_err(clipboard_err)?,
        };
        self.handle.insert(handle).set_text(text).map_err(clipboard_err)?;
        logd!("Clipboard: {} bytes", text.len());
        Ok(())
    }
}

/// Holds the last write; optionally refuses like a denied permission.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    pub contents: Option<String>,
    pub deny: bool,
}

impl MemoryClipboard {
    pub fn denied() -> Self {
        Self { contents: None, deny: true }
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), HarvestError> {
        if self.deny {
            return Err(HarvestError::Clipboard(s!("permission denied")));
        }
        self.contents = Some(s!(text));
        Ok(())
    }
}
