use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::components::Component;
use crate::config::Palette;
use crate::pack::{Anchor, Fill, ResolvedPack, Side};
use crate::ui::UiFrame;
use crate::widget::WidgetNode;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Shown {
    label: String,
    resolved: ResolvedPack,
    extra: Vec<(String, String)>,
    warning: bool,
}

/// Pack options of the active widget, one row per option with every
/// possible value listed and the effective one bracketed.
pub struct PackPanelComponent {
    palette: Palette,
    shown: Option<Shown>,
}

impl PackPanelComponent {
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            shown: None,
        }
    }

    pub fn show(&mut self, node: &WidgetNode, resolved: ResolvedPack) {
        let extra = node
            .pack_args()
            .extra()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        self.shown = Some(Shown {
            label: node.label(),
            resolved,
            extra,
            warning: node.is_unpacked_warning(),
        });
    }

    pub fn clear(&mut self) {
        self.shown = None;
    }

    pub fn is_empty(&self) -> bool {
        self.shown.is_none()
    }

    /// Plain-text rows as rendered, without styling.
    pub fn lines(&self) -> Vec<String> {
        self.styled_lines()
            .into_iter()
            .map(|line| {
                line.spans
                    .iter()
                    .map(|s| s.content.as_ref())
                    .collect::<String>()
            })
            .collect()
    }

    fn styled_lines(&self) -> Vec<Line<'static>> {
        let Some(shown) = &self.shown else {
            return vec![Line::from("No widget selected")];
        };
        let r = shown.resolved;
        let mut lines = vec![Line::from(Span::styled(
            shown.label.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ))];
        lines.push(self.choice_row(
            "side",
            Side::ALL.iter().map(|s| s.as_str()),
            r.side.as_str(),
        ));
        lines.push(self.choice_row(
            "anchor",
            Anchor::ALL.iter().map(|a| a.as_str()),
            r.anchor.as_str(),
        ));
        lines.push(self.choice_row(
            "fill",
            Fill::ALL.iter().map(|f| f.as_str()),
            r.fill.as_str(),
        ));
        lines.push(self.choice_row(
            "expand",
            ["0", "1"].into_iter(),
            if r.expand { "1" } else { "0" },
        ));
        for (key, value) in &shown.extra {
            lines.push(Line::from(format!("{key:<7} {value}")));
        }
        if shown.warning {
            lines.push(Line::from(Span::styled(
                "not packed",
                Style::default().bg(self.palette.warning),
            )));
        }
        lines
    }

    fn choice_row<'v>(
        &self,
        name: &str,
        values: impl Iterator<Item = &'v str>,
        chosen: &str,
    ) -> Line<'static> {
        let mut spans = vec![Span::raw(format!("{name:<7}"))];
        for value in values {
            spans.push(Span::raw(" "));
            if value == chosen {
                spans.push(Span::styled(
                    format!("[{value}]"),
                    Style::default()
                        .fg(self.palette.active)
                        .add_modifier(Modifier::BOLD),
                ));
            } else {
                spans.push(Span::raw(value.to_string()));
            }
        }
        Line::from(spans)
    }
}

impl Component for PackPanelComponent {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _focused: bool) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Pack options");
        frame.render_widget(Paragraph::new(self.styled_lines()).block(block), area);
    }
}
