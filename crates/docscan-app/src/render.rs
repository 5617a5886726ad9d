use std::fmt::Write as _;
use std::io::Write;

use docscan_core::ScanView;

/// Writes session frames to a terminal, skipping frames identical to the last one.
pub struct Renderer {
    out: Box<dyn Write + Send>,
    last_frame: Option<String>,
}

impl Renderer {
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out,
            last_frame: None,
        }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }

    pub fn render(&mut self, view: &ScanView) -> std::io::Result<()> {
        let frame = format_view(view);
        if self.last_frame.as_deref() == Some(frame.as_str()) {
            return Ok(());
        }
        self.out.write_all(frame.as_bytes())?;
        self.out.flush()?;
        self.last_frame = Some(frame);
        Ok(())
    }

    /// Unconditional redraw
    pub fn redraw(&mut self, view: &ScanView) -> std::io::Result<()> {
        self.last_frame = None;
        self.render(view)
    }

    pub fn print(&mut self, text: &str) -> std::io::Result<()> {
        writeln!(self.out, "{}", text)?;
        self.out.flush()
    }
}

pub fn format_view(view: &ScanView) -> String {
    let mut frame = String::new();
    let _ = writeln!(frame, "--- docscan [{}] ---", view.phase);

    match &view.image {
        Some(image) => {
            let _ = writeln!(
                frame,
                "image:   {} ({}, {}, {})",
                image.name.as_deref().unwrap_or("<unnamed>"),
                image.media_type,
                human_size(image.size_bytes),
                image.origin
            );
        }
        None => {
            let _ = writeln!(frame, "image:   none selected");
        }
    }

    if let Some(preview) = &view.preview {
        let dimensions = preview
            .dimensions()
            .map(|(w, h)| format!("{}x{}", w, h))
            .unwrap_or_else(|| "unknown size".to_string());
        let _ = writeln!(
            frame,
            "preview: {}, {} char data URI",
            dimensions,
            preview.data_uri().len()
        );
    }

    if view.loading {
        let _ = writeln!(frame, "... processing, please wait");
    }

    if let Some(result) = &view.result {
        let _ = writeln!(frame, "result:");
        for line in result.lines() {
            let _ = writeln!(frame, "  {}", line);
        }
    }

    if let Some(failure) = &view.failure {
        let _ = writeln!(frame, "failed:  {}", failure.message);
    }

    if let Some(notification) = &view.notification {
        let tag = if notification.is_error { "error" } else { "ok" };
        let _ = writeln!(frame, "[{}] {}", tag, notification.message);
    }

    frame
}

fn human_size(bytes: usize) -> String {
    const KIB: f64 = 1024.0;
    let bytes_f = bytes as f64;
    if bytes_f < KIB {
        format!("{} B", bytes)
    } else if bytes_f < KIB * KIB {
        format!("{:.1} KiB", bytes_f / KIB)
    } else {
        format!("{:.1} MiB", bytes_f / (KIB * KIB))
    }
}
