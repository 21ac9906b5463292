use crate::passes;
use crate::settings::Dialect;
use crate::structures::model::ConfigurationModel;
use crate::structures::tree::ParseNode;

#[derive(Debug, Clone)]
pub struct ExtractOpts {
    dialect: Dialect,
    note_ignored_stanzas: bool,
}

impl ExtractOpts {
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn note_ignored_stanzas(&self) -> bool {
        self.note_ignored_stanzas
    }
}

#[derive(Debug, Clone)]
pub struct ExtractOptsBuilder {
    dialect: Dialect,
    note_ignored_stanzas: bool,
}

impl Default for ExtractOptsBuilder {
    fn default() -> Self {
        Self {
            dialect: Dialect::Ios,
            note_ignored_stanzas: false,
        }
    }
}

impl ExtractOptsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Record an info diagnostic for every recognized-but-unprocessed
    /// stanza the tree contains.
    pub fn note_ignored_stanzas(mut self, note: bool) -> Self {
        self.note_ignored_stanzas = note;
        self
    }

    pub fn build(self) -> ExtractOpts {
        ExtractOpts {
            dialect: self.dialect,
            note_ignored_stanzas: self.note_ignored_stanzas,
        }
    }
}

/// Walks an already-parsed configuration tree into a [`ConfigurationModel`].
///
/// Always returns a model; anything wrong with the configuration itself is
/// recorded in the model's diagnostics. Panics only on an inconsistent tree
/// (body lines outside their stanza), which indicates a bug in whatever
/// built the tree, not bad input.
pub fn extract(tree: &ParseNode, opts: ExtractOpts) -> ConfigurationModel {
    let mut model = passes::build_model::build_model(tree, &opts);
    model.resolve_pending();
    model
}
