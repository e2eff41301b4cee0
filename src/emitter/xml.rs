use quick_xml::escape::escape;
use std::fmt::{self, Write};

/// Indenting writer for one XML fragment.
#[derive(Debug, Default)]
pub(super) struct XmlWriter {
    buf: String,
    depth: usize,
}

fn write_attrs(buf: &mut String, attrs: &[(&str, &str)]) -> fmt::Result {
    for (name, value) in attrs {
        write!(buf, " {}=\"{}\"", name, escape(*value))?;
    }
    Ok(())
}

/// Wraps `text` in CDATA, splitting any `]]>` it contains.
pub(super) fn cdata(text: &str) -> String {
    format!("<![CDATA[{}]]>", text.replace("]]>", "]]]]><![CDATA[>"))
}

impl XmlWriter {
    pub(super) fn with_depth(depth: usize) -> Self {
        Self {
            buf: String::new(),
            depth,
        }
    }

    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.buf.push_str("  ");
        }
    }

    pub(super) fn raw_line(&mut self, line: &str) -> fmt::Result {
        self.indent();
        writeln!(self.buf, "{}", line)
    }

    pub(super) fn open(&mut self, name: &str, attrs: &[(&str, &str)]) -> fmt::Result {
        self.indent();
        write!(self.buf, "<{}", name)?;
        write_attrs(&mut self.buf, attrs)?;
        writeln!(self.buf, ">")?;
        self.depth += 1;
        Ok(())
    }

    pub(super) fn close(&mut self, name: &str) -> fmt::Result {
        self.depth = self.depth.saturating_sub(1);
        self.indent();
        writeln!(self.buf, "</{}>", name)
    }

    pub(super) fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> fmt::Result {
        self.indent();
        write!(self.buf, "<{}", name)?;
        write_attrs(&mut self.buf, attrs)?;
        writeln!(self.buf, "/>")
    }

    /// Element whose only content is escaped text.
    pub(super) fn text(&mut self, name: &str, attrs: &[(&str, &str)], text: &str) -> fmt::Result {
        self.indent();
        write!(self.buf, "<{}", name)?;
        write_attrs(&mut self.buf, attrs)?;
        writeln!(self.buf, ">{}</{}>", escape(text), name)
    }

    /// Element whose only content is a CDATA section.
    pub(super) fn cdata(&mut self, name: &str, attrs: &[(&str, &str)], text: &str) -> fmt::Result {
        self.indent();
        write!(self.buf, "<{}", name)?;
        write_attrs(&mut self.buf, attrs)?;
        writeln!(self.buf, ">{}</{}>", cdata(text), name)
    }

    pub(super) fn push_fragment(&mut self, fragment: XmlWriter) {
        self.buf.push_str(&fragment.buf);
    }

    pub(super) fn finish(self) -> String {
        self.buf
    }
}
