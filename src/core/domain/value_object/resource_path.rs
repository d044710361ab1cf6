//! Resolution of REST paths from literal/placeholder templates.
//!
//! A template like `nodes/{node}/qemu/{vmid}/status/current` is parsed once
//! and identifiers are bound positionally while the caller navigates from
//! parent to child resource. Resolution substitutes each bound value into
//! its placeholder and percent-encodes it as a single path segment.

use crate::core::domain::error::{PveError, PveResult, ValidationError};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

/// Characters that must not appear raw inside a single path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b']')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A REST path under construction: a parsed template plus the identifier
/// values bound so far.
///
/// Binding is positional; the first bound value fills the first placeholder.
/// The value is pure and cheap to build, so instances are created fresh per
/// call and never cached.
///
/// # Examples
///
/// ```
/// use pverest::ResourcePath;
///
/// let path = ResourcePath::parse("nodes/{node}/qemu/{vmid}/status/current")
///     .bind("pve1")
///     .bind(100u32)
///     .resolve()
///     .unwrap();
/// assert_eq!(path, "nodes/pve1/qemu/100/status/current");
/// ```
#[derive(Debug, Clone)]
pub struct ResourcePath {
    template: String,
    segments: Vec<Segment>,
    bindings: Vec<String>,
}

impl ResourcePath {
    /// Parses a `/`-separated template. Segments wrapped in `{}` become
    /// placeholders; everything else is taken literally.
    pub fn parse(template: &str) -> Self {
        let segments = template
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| {
                if s.len() > 2 && s.starts_with('{') && s.ends_with('}') {
                    Segment::Placeholder(s[1..s.len() - 1].to_string())
                } else {
                    Segment::Literal(s.to_string())
                }
            })
            .collect();
        Self {
            template: template.to_string(),
            segments,
            bindings: Vec::new(),
        }
    }

    /// Binds the next placeholder, in template order.
    #[must_use]
    pub fn bind(mut self, value: impl ToString) -> Self {
        self.bindings.push(value.to_string());
        self
    }

    /// Number of placeholders in the template.
    #[must_use]
    pub fn placeholders(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Placeholder(_)))
            .count()
    }

    /// Renders the final path string.
    ///
    /// # Errors
    ///
    /// Returns [`PveError::UnboundPlaceholder`] when a placeholder has no
    /// bound value, and a validation error when more values were bound than
    /// the template has placeholders. Both indicate misuse by the caller.
    pub fn resolve(&self) -> PveResult<String> {
        if self.bindings.len() > self.placeholders() {
            return Err(ValidationError::ConstraintViolation(format!(
                "{} values bound to template '{}' with {} placeholders",
                self.bindings.len(),
                self.template,
                self.placeholders()
            ))
            .into());
        }

        let mut bound = self.bindings.iter();
        let mut resolved = Vec::with_capacity(self.segments.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(s) => resolved.push(s.clone()),
                Segment::Placeholder(name) => match bound.next() {
                    Some(value) => resolved.push(encode_segment(value)),
                    None => {
                        return Err(PveError::UnboundPlaceholder {
                            name: name.clone(),
                            template: self.template.clone(),
                        });
                    }
                },
            }
        }
        Ok(resolved.join("/"))
    }
}

fn encode_segment(value: &str) -> String {
    utf8_percent_encode(value, SEGMENT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_template_resolves_unchanged() {
        let path = ResourcePath::parse("cluster/status").resolve().unwrap();
        assert_eq!(path, "cluster/status");
    }

    #[test]
    fn test_bindings_interpolate_in_navigation_order() {
        let path = ResourcePath::parse("nodes/{node}/qemu/{vmid}/status/current")
            .bind("pve1")
            .bind(100u32)
            .resolve()
            .unwrap();
        assert_eq!(path, "nodes/pve1/qemu/100/status/current");
    }

    #[test]
    fn test_missing_binding_names_first_unbound_placeholder() {
        let result = ResourcePath::parse("nodes/{node}/qemu/{vmid}")
            .bind("pve1")
            .resolve();
        match result {
            Err(PveError::UnboundPlaceholder { name, template }) => {
                assert_eq!(name, "vmid");
                assert_eq!(template, "nodes/{node}/qemu/{vmid}");
            }
            other => panic!("expected UnboundPlaceholder, got {:?}", other),
        }
    }

    #[test]
    fn test_no_bindings_at_all() {
        let result = ResourcePath::parse("nodes/{node}").resolve();
        assert!(matches!(
            result,
            Err(PveError::UnboundPlaceholder { .. })
        ));
    }

    #[test]
    fn test_excess_bindings_fail() {
        let result = ResourcePath::parse("cluster/status").bind("extra").resolve();
        assert!(matches!(result, Err(PveError::Validation(_))));
    }

    #[test]
    fn test_bound_values_are_percent_encoded_once() {
        let path = ResourcePath::parse("nodes/{node}/storage/{storage}")
            .bind("pve 1")
            .bind("local/zfs")
            .resolve()
            .unwrap();
        assert_eq!(path, "nodes/pve%201/storage/local%2Fzfs");

        // A literal percent sign must not be double-encoded on re-resolution
        // of a fresh path.
        let path = ResourcePath::parse("pools/{poolid}")
            .bind("50%")
            .resolve()
            .unwrap();
        assert_eq!(path, "pools/50%25");
    }

    #[test]
    fn test_firewall_group_rule_scenario() {
        let path = ResourcePath::parse("cluster/firewall/groups/{group}/{pos}")
            .bind("webservers")
            .bind(3u32)
            .resolve()
            .unwrap();
        assert_eq!(path, "cluster/firewall/groups/webservers/3");
    }
}
