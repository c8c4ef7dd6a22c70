//! Inline `style` attribute handling

use std::fmt;

/// Display state of a label as written in its `display` declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// `display: inline`
    Shown,
    /// `display: none`
    Hidden,
}

impl Visibility {
    pub const PROPERTY: &'static str = "display";

    pub fn css_value(self) -> &'static str {
        match self {
            Visibility::Shown => "inline",
            Visibility::Hidden => "none",
        }
    }

    /// Any display value other than `none` counts as shown.
    pub fn from_css(value: &str) -> Self {
        let value = value.trim().trim_end_matches("!important").trim_end();
        if value.eq_ignore_ascii_case("none") {
            Visibility::Hidden
        } else {
            Visibility::Shown
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Shown => write!(f, "shown"),
            Visibility::Hidden => write!(f, "hidden"),
        }
    }
}

/// Ordered list of `property: value` declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineStyle {
    declarations: Vec<(String, String)>,
}

impl InlineStyle {
    /// Parse `a: b; c: d`. Entries without a colon are dropped.
    pub fn parse(style: &str) -> Self {
        let declarations = style
            .split(';')
            .filter_map(|decl| decl.split_once(':'))
            .map(|(prop, value)| (prop.trim().to_ascii_lowercase(), value.trim().to_string()))
            .filter(|(prop, _)| !prop.is_empty())
            .collect();
        Self { declarations }
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .rev()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.as_str())
    }

    pub fn set(&mut self, property: &str, value: &str) {
        let property = property.to_ascii_lowercase();
        // later duplicates win in CSS, so collapse them into the first slot
        let mut seen = false;
        self.declarations.retain_mut(|(p, v)| {
            if *p != property {
                return true;
            }
            if seen {
                return false;
            }
            seen = true;
            *v = value.to_string();
            true
        });
        if !seen {
            self.declarations.push((property, value.to_string()));
        }
    }

    pub fn visibility(&self) -> Option<Visibility> {
        self.get(Visibility::PROPERTY).map(Visibility::from_css)
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

impl fmt::Display for InlineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (prop, value)) in self.declarations.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{prop}: {value}")?;
        }
        Ok(())
    }
}
