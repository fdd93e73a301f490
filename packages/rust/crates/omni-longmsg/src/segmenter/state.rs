use super::boundary::choose_cut;
use super::{Chunk, OversizePolicy, Segmenter};
use crate::tags::{TagStack, close_suffix, open_spans, reopen_prefix};

/// Per-call buffer state. Derived span state is rebuilt at every boundary.
pub(super) struct SplitState<'s> {
    segmenter: &'s Segmenter,
    buffer: String,
    prefix_len: usize,
    chunks: Vec<Chunk>,
}

impl<'s> SplitState<'s> {
    pub(super) fn new(segmenter: &'s Segmenter) -> Self {
        Self {
            segmenter,
            buffer: String::new(),
            prefix_len: 0,
            chunks: Vec::new(),
        }
    }

    pub(super) fn push_unit(&mut self, unit: &str) {
        if unit.is_empty() {
            return;
        }

        let mut prospective = String::with_capacity(self.buffer.len() + unit.len());
        prospective.push_str(&self.buffer);
        prospective.push_str(unit);
        if self.segmenter.fits(&prospective) {
            self.buffer = prospective;
            return;
        }

        let tail = self.flush();
        self.buffer = reopen_prefix(&tail);
        self.prefix_len = self.buffer.len();
        self.buffer.push_str(unit);
        if self.segmenter.fits(&self.buffer) {
            return;
        }

        match self.segmenter.oversize_policy {
            OversizePolicy::PassThrough => tracing::warn!(
                unit_chars = unit.chars().count(),
                max_len = self.segmenter.max_len,
                "single unit exceeds chunk budget; passing it through oversized"
            ),
            OversizePolicy::HardSplit => self.hard_split(),
        }
    }

    pub(super) fn finish(mut self) -> Vec<Chunk> {
        self.flush();
        self.chunks
    }

    /// Emit the buffer (closed) unless its body is blank; returns the spans
    /// the next buffer must reopen.
    ///
    /// Blank lines normally ride along with the following unit, so a blank
    /// body only gets here when it fits with neither neighbour or ends the
    /// document. It is dropped: transports reject whitespace-only messages.
    fn flush(&mut self) -> TagStack {
        let stack = open_spans(&self.buffer, self.segmenter.dialect);
        let has_content = !self.buffer[self.prefix_len..].trim().is_empty();
        if has_content {
            let text = std::mem::take(&mut self.buffer);
            self.emit(text, &close_suffix(&stack));
        } else if self.buffer.len() > self.prefix_len {
            tracing::debug!(
                chars = self.buffer[self.prefix_len..].chars().count(),
                "dropping whitespace-only chunk body"
            );
        }
        self.buffer.clear();
        self.prefix_len = 0;
        stack
    }

    fn hard_split(&mut self) {
        while !self.segmenter.fits(&self.buffer) {
            let cut = choose_cut(self.segmenter, &self.buffer, self.prefix_len);
            if cut >= self.buffer.len() {
                break;
            }
            let rest = self.buffer.split_off(cut);
            let stack = open_spans(&self.buffer, self.segmenter.dialect);
            let head = std::mem::take(&mut self.buffer);
            self.emit(head, &close_suffix(&stack));

            self.buffer = reopen_prefix(&stack);
            self.prefix_len = self.buffer.len();
            self.buffer.push_str(&rest);
        }
    }

    fn emit(&mut self, mut text: String, suffix: &str) {
        text.push_str(suffix);
        let chunk = Chunk::new(text, self.prefix_len, suffix.len(), self.segmenter.max_len);
        if chunk.is_oversized() {
            tracing::warn!(
                index = self.chunks.len(),
                chars = chunk.char_len(),
                max_len = self.segmenter.max_len,
                "emitting oversized chunk"
            );
        }
        self.chunks.push(chunk);
    }
}
