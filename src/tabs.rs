#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabPane {
    pub id: String,
    pub title: String,
    pub active: bool,
}

/// Mutually exclusive set of report panes, each paired with a button by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabSet {
    panes: Vec<TabPane>,
}

impl TabSet {
    /// The first pane starts active.
    pub fn new<I, S, T>(panes: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        let panes = panes
            .into_iter()
            .enumerate()
            .map(|(i, (id, title))| TabPane {
                id: id.into(),
                title: title.into(),
                active: i == 0,
            })
            .collect();
        TabSet { panes }
    }

    pub fn standard() -> Self {
        TabSet::new([
            ("ranking", "Ranking Analysis"),
            ("sentiment", "Review Analysis"),
            ("trends", "Trends"),
            ("advanced", "Advanced Analysis"),
        ])
    }

    /// Clear every pane, then activate the one matching `id`. An unknown id
    /// leaves nothing active. Returns whether a pane matched.
    pub fn switch_tab(&mut self, id: &str) -> bool {
        let mut matched = false;
        for pane in &mut self.panes {
            pane.active = pane.id == id;
            matched |= pane.active;
        }
        matched
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.panes.iter().any(|p| p.active && p.id == id)
    }

    pub fn active_id(&self) -> Option<&str> {
        self.panes.iter().find(|p| p.active).map(|p| p.id.as_str())
    }

    pub fn panes(&self) -> &[TabPane] {
        &self.panes
    }
}
