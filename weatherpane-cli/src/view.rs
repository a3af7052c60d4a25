use std::io::{self, Write};

use weatherpane_core::{MissingTarget, ViewSink, ViewTarget};

/// Plain-text view: one `label  value` row per target in its layout.
#[derive(Debug)]
pub struct TextView {
    layout: Vec<ViewTarget>,
    pending: Vec<(ViewTarget, String)>,
}

impl TextView {
    pub fn new(layout: Vec<ViewTarget>) -> Self {
        Self {
            layout,
            pending: Vec::new(),
        }
    }

    /// Writes bound rows in layout order and clears them.
    pub fn flush(&mut self) -> io::Result<()> {
        let mut out = io::stdout().lock();
        self.write_to(&mut out)?;
        out.flush()
    }

    fn write_to<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        let mut rows = std::mem::take(&mut self.pending);
        rows.sort_by_key(|(target, _)| self.position(*target));

        for (target, value) in rows {
            writeln!(out, "{:<13}{}", label(target), value)?;
        }
        Ok(())
    }

    fn position(&self, target: ViewTarget) -> usize {
        self.layout
            .iter()
            .position(|t| *t == target)
            .unwrap_or(usize::MAX)
    }
}

impl ViewSink for TextView {
    fn bind(&mut self, target: ViewTarget, value: &str) -> Result<(), MissingTarget> {
        if !self.layout.contains(&target) {
            return Err(MissingTarget(target));
        }
        self.pending.push((target, value.to_string()));
        Ok(())
    }
}

fn label(target: ViewTarget) -> &'static str {
    match target {
        ViewTarget::Location => "Location",
        ViewTarget::Temperature => "Temperature",
        ViewTarget::Description => "Conditions",
        ViewTarget::Icon => "Icon",
        ViewTarget::CurrentTime => "Time",
        ViewTarget::Date => "Date",
        ViewTarget::Sunrise => "Sunrise",
        ViewTarget::Sunset => "Sunset",
        ViewTarget::Humidity => "Humidity",
        ViewTarget::Wind => "Wind",
        ViewTarget::Background => "Background",
    }
}
