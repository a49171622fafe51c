//! Navigation and section document model.

/// In-page navigation link carrying a fragment-identifier target.
///
/// Links are discovered once per document; afterwards only the `active`
/// presentation flag mutates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub target_id: String,
    pub label: String,
    pub active: bool,
}

impl NavLink {
    pub fn new(target_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            target_id: target_id.into(),
            label: label.into(),
            active: false,
        }
    }
}

/// Document element addressable through its `id` attribute.
///
/// Vertical position is deliberately absent: it is read live from the
/// layout oracle on every computation, never cached on the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub id: String,
    pub heading: String,
    pub body_text: String,
}

impl Section {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            heading: String::new(),
            body_text: String::new(),
        }
    }
}

/// Discovered navigation structure of one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub title: Option<String>,
    pub links: Vec<NavLink>,
    pub sections: Vec<Section>,
}

impl Document {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn has_sections(&self) -> bool {
        !self.sections.is_empty()
    }

    /// First section carrying `id`, matching browser id lookup semantics.
    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.id == id)
    }

    /// Marks the first link targeting `id` active and every other link
    /// inactive. Only one link may carry the marker at a time, so duplicate
    /// nav entries for the same target do not all light up.
    pub fn set_active_target(&mut self, id: &str) {
        let mut claimed = false;
        for link in &mut self.links {
            let is_match = !claimed && link.target_id == id;
            if is_match {
                claimed = true;
            }
            link.active = is_match;
        }
    }

    pub fn clear_active(&mut self) {
        for link in &mut self.links {
            link.active = false;
        }
    }

    pub fn active_link(&self) -> Option<&NavLink> {
        self.links.iter().find(|link| link.active)
    }

    pub fn active_count(&self) -> usize {
        self.links.iter().filter(|link| link.active).count()
    }
}

#[cfg(test)]
mod tests {
    use super::Document;
    use super::NavLink;
    use super::Section;

    fn document_with_links(targets: &[&str]) -> Document {
        let mut document = Document::empty();
        for target in targets {
            document.links.push(NavLink::new(*target, *target));
            document.sections.push(Section::new(*target));
        }
        document
    }

    #[test]
    fn activation_marks_exactly_one_link() {
        let mut document = document_with_links(&["intro", "details", "contact"]);
        document.set_active_target("details");
        assert_eq!(document.active_count(), 1);
        assert_eq!(
            document.active_link().map(|link| link.target_id.as_str()),
            Some("details")
        );
    }

    #[test]
    fn activation_moves_between_links() {
        let mut document = document_with_links(&["intro", "details"]);
        document.set_active_target("intro");
        document.set_active_target("details");
        assert_eq!(document.active_count(), 1);
        assert_eq!(
            document.active_link().map(|link| link.target_id.as_str()),
            Some("details")
        );
    }

    #[test]
    fn duplicate_targets_activate_only_the_first_link() {
        let mut document = Document::empty();
        document.links.push(NavLink::new("intro", "Intro"));
        document.links.push(NavLink::new("intro", "Introduction"));
        document.sections.push(Section::new("intro"));

        document.set_active_target("intro");
        assert_eq!(document.active_count(), 1);
        assert_eq!(
            document.active_link().map(|link| link.label.as_str()),
            Some("Intro")
        );
    }

    #[test]
    fn unknown_target_clears_every_link() {
        let mut document = document_with_links(&["intro"]);
        document.set_active_target("intro");
        document.set_active_target("missing");
        assert_eq!(document.active_count(), 0);
    }

    #[test]
    fn section_lookup_returns_first_occurrence() {
        let mut document = Document::empty();
        let mut first = Section::new("dup");
        first.heading = "first".to_owned();
        let mut second = Section::new("dup");
        second.heading = "second".to_owned();
        document.sections.push(first);
        document.sections.push(second);

        assert_eq!(
            document.section("dup").map(|section| section.heading.as_str()),
            Some("first")
        );
    }
}
