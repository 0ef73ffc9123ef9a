//! Recognition and parsing of `notmuch tag` operations.

/// Commands starting with this prefix are batched on replay instead of being
/// run through the shell.
pub const TAG_PREFIX: &str = "notmuch tag";

/// Tags that notmuch mirrors into maildir flags when
/// `maildir.synchronize_flags` is on. Those already travel with the mail
/// files, so recording them again would be redundant.
pub const MIRRORED_TAGS: [&str; 5] = ["unread", "draft", "replied", "flagged", "passed"];

pub fn is_tag_command(text: &str) -> bool {
    text.starts_with(TAG_PREFIX)
}

/// The part after [`TAG_PREFIX`], trimmed: one line of `notmuch tag --input`.
pub fn batch_line(text: &str) -> Option<&str> {
    text.strip_prefix(TAG_PREFIX).map(str::trim)
}

/// `+tag`/`-tag` mutations and the query they apply to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagArgs {
    pub tags: Vec<String>,
    pub query: String,
}

impl TagArgs {
    /// Split the argument string of a tag command.
    ///
    /// Leading `+x`/`-x` tokens are tag mutations. A `--` token ends them and
    /// is dropped; any other token ends them and is the first query word.
    pub fn parse(args: &str) -> Self {
        let mut tags = Vec::new();
        let mut query = Vec::new();
        let mut in_tags = true;

        for token in args.split_whitespace() {
            if !in_tags {
                query.push(token);
            } else if token == "--" {
                in_tags = false;
            } else if token.starts_with('+') || token.starts_with('-') {
                tags.push(token.to_string());
            } else {
                in_tags = false;
                query.push(token);
            }
        }

        Self {
            tags,
            query: query.join(" "),
        }
    }

    /// True when every mutation touches only a flag-mirrored tag.
    /// Vacuously true when there are no mutations.
    pub fn only_mirrored_tags(&self) -> bool {
        self.tags
            .iter()
            .all(|t| MIRRORED_TAGS.contains(&&t[1..]))
    }
}

/// Whether recording `text` can be skipped because flag mirroring already
/// propagates everything it changes.
pub fn covered_by_flag_mirroring(text: &str) -> bool {
    match text.strip_prefix(TAG_PREFIX) {
        Some(args) => TagArgs::parse(args).only_mirrored_tags(),
        None => false,
    }
}
