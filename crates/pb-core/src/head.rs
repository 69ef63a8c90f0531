//! Document head model: the global style blocks the builder manages.
//!
//! Only one block is ever written by the builder, the custom stylesheet,
//! but the head keeps every block it was given so that re-attaching the
//! custom block reproduces `appendChild` ordering.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StyleBlock {
    pub id: Option<String>,
    pub css: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DocumentHead {
    blocks: Vec<StyleBlock>,
}

impl DocumentHead {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blocks(&self) -> &[StyleBlock] {
        &self.blocks
    }

    /// Attach a style block at the end of the head.
    pub fn push(&mut self, block: StyleBlock) {
        self.blocks.push(block);
    }

    pub fn style_block(&self, id: &str) -> Option<&StyleBlock> {
        self.blocks.iter().find(|b| b.id.as_deref() == Some(id))
    }

    /// Find the block with `id` or create it, replace its whole content with
    /// `css`, and (re)attach it as the last child of the head.
    pub fn apply_custom_css(&mut self, id: &str, css: &str) -> &StyleBlock {
        let mut block = match self.blocks.iter().position(|b| b.id.as_deref() == Some(id)) {
            Some(pos) => self.blocks.remove(pos),
            None => StyleBlock::default(),
        };
        block.id = Some(id.to_string());
        block.css = css.to_string();
        self.blocks.push(block);
        &self.blocks[self.blocks.len() - 1]
    }

    /// Serialize the head's style blocks as markup.
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            match &block.id {
                Some(id) => {
                    out.push_str("<style id=\"");
                    crate::emitter::escape_attr(&mut out, id);
                    out.push_str("\">");
                }
                None => out.push_str("<style>"),
            }
            out.push_str(&block.css);
            out.push_str("</style>");
        }
        out
    }
}
