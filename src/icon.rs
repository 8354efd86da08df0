use crate::db::RawRule;
use crate::error::{IconError, Result};
use crate::pattern::Pattern;

/// Rendered CSS class, either joined with a space or split into parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassName {
    Single(String),
    Sequence(Vec<String>),
}

/// One immutable icon rule.
#[derive(Debug, Clone)]
pub struct Icon {
    index: usize,
    class: String,
    colours: Vec<Option<String>>,
    pattern: Option<Pattern>,
    priority: i32,
    match_path: bool,
    interpreter: Option<Pattern>,
    scope: Option<Pattern>,
    language: Option<Pattern>,
    signature: Option<String>,
}

impl Icon {
    pub fn new(index: usize, raw: RawRule) -> Self {
        let compile = |source: Option<String>| source.as_deref().map(Pattern::parse);
        Icon {
            index,
            class: raw.class,
            colours: raw.colours.unwrap_or_default(),
            pattern: compile(raw.pattern),
            priority: raw.priority.unwrap_or(1),
            match_path: raw.match_path.unwrap_or(false),
            interpreter: compile(raw.interpreter),
            scope: compile(raw.scope),
            language: compile(raw.language),
            signature: raw.signature,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn colours(&self) -> &[Option<String>] {
        &self.colours
    }

    pub fn pattern(&self) -> Option<&Pattern> {
        self.pattern.as_ref()
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn match_path(&self) -> bool {
        self.match_path
    }

    pub fn interpreter(&self) -> Option<&Pattern> {
        self.interpreter.as_ref()
    }

    pub fn scope(&self) -> Option<&Pattern> {
        self.scope.as_ref()
    }

    pub fn language(&self) -> Option<&Pattern> {
        self.language.as_ref()
    }

    pub fn signature(&self) -> Option<&str> {
        self.signature.as_deref()
    }

    /// Every compiled pattern of this rule, labelled by field.
    pub(crate) fn patterns(&self) -> impl Iterator<Item = (&'static str, &Pattern)> {
        [
            ("match", self.pattern.as_ref()),
            ("interpreter", self.interpreter.as_ref()),
            ("scope", self.scope.as_ref()),
            ("language", self.language.as_ref()),
        ]
        .into_iter()
        .filter_map(|(field, p)| p.map(|p| (field, p)))
    }

    /// Resolve the colour class for `colour_mode`, if any applies.
    ///
    /// A mode past the end of a non-empty colour list is an error; a `null`
    /// variant means the rule has no colour for that mode.
    fn colour(&self, colour_mode: Option<usize>) -> Result<Option<&str>> {
        let Some(mode) = colour_mode else {
            return Ok(None);
        };
        if self.colours.is_empty() {
            return Ok(None);
        }
        match self.colours.get(mode) {
            Some(variant) => Ok(variant.as_deref()),
            None => Err(IconError::ColourModeOutOfRange {
                class: self.class.clone(),
                mode,
                available: self.colours.len(),
            }),
        }
    }

    pub fn render_class(&self, colour_mode: Option<usize>) -> Result<String> {
        Ok(match self.colour(colour_mode)? {
            Some(colour) => format!("{} {colour}", self.class),
            None => self.class.clone(),
        })
    }

    pub fn render_classes(&self, colour_mode: Option<usize>) -> Result<Vec<String>> {
        let mut classes = vec![self.class.clone()];
        if let Some(colour) = self.colour(colour_mode)? {
            classes.push(colour.to_string());
        }
        Ok(classes)
    }

    pub fn get_class(&self, colour_mode: Option<usize>, as_sequence: bool) -> Result<ClassName> {
        if as_sequence {
            self.render_classes(colour_mode).map(ClassName::Sequence)
        } else {
            self.render_class(colour_mode).map(ClassName::Single)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(class: &str, colours: Option<Vec<Option<&str>>>) -> RawRule {
        RawRule {
            class: class.into(),
            colours: colours.map(|c| c.into_iter().map(|v| v.map(String::from)).collect()),
            pattern: Some(r"/\.js$/".into()),
            priority: None,
            match_path: None,
            interpreter: None,
            scope: None,
            language: None,
            signature: None,
        }
    }

    #[test]
    fn defaults_from_short_row() {
        let icon = Icon::new(3, rule("js-icon", None));
        assert_eq!(icon.index(), 3);
        assert_eq!(icon.priority(), 1);
        assert!(!icon.match_path());
        assert!(icon.colours().is_empty());
        assert!(icon.interpreter().is_none());
        assert!(icon.pattern().is_some_and(|p| p.is_match("a.js")));
    }

    #[test]
    fn no_colour_mode_gives_plain_class() {
        let icon = Icon::new(0, rule("js-icon", Some(vec![Some("medium-yellow"), Some("blue")])));
        assert_eq!(icon.render_class(None).unwrap(), "js-icon");
        assert_eq!(icon.render_classes(None).unwrap(), vec!["js-icon"]);
    }

    #[test]
    fn colour_mode_selects_variant() {
        let icon = Icon::new(0, rule("js-icon", Some(vec![Some("medium-yellow"), Some("blue")])));
        assert_eq!(icon.render_class(Some(0)).unwrap(), "js-icon medium-yellow");
        assert_eq!(icon.render_class(Some(1)).unwrap(), "js-icon blue");
        assert_eq!(
            icon.get_class(Some(1), true).unwrap(),
            ClassName::Sequence(vec!["js-icon".into(), "blue".into()])
        );
        assert_eq!(
            icon.get_class(Some(1), false).unwrap(),
            ClassName::Single("js-icon blue".into())
        );
    }

    #[test]
    fn null_variant_gives_plain_class() {
        let icon = Icon::new(0, rule("js-icon", Some(vec![None, Some("blue")])));
        assert_eq!(icon.render_class(Some(0)).unwrap(), "js-icon");
        assert_eq!(icon.render_class(Some(1)).unwrap(), "js-icon blue");
    }

    #[test]
    fn missing_colours_ignore_mode() {
        let icon = Icon::new(0, rule("text-icon", None));
        assert_eq!(icon.render_class(Some(5)).unwrap(), "text-icon");
        assert_eq!(
            icon.get_class(Some(5), true).unwrap(),
            ClassName::Sequence(vec!["text-icon".into()])
        );
    }

    #[test]
    fn out_of_range_colour_mode_fails() {
        let icon = Icon::new(0, rule("js-icon", Some(vec![None, Some("blue")])));
        match icon.render_class(Some(2)) {
            Err(IconError::ColourModeOutOfRange {
                class,
                mode,
                available,
            }) => {
                assert_eq!(class, "js-icon");
                assert_eq!(mode, 2);
                assert_eq!(available, 2);
            }
            other => panic!("expected ColourModeOutOfRange, got {other:?}"),
        }
        assert!(icon.render_classes(Some(9)).is_err());
    }
}
