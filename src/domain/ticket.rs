//! A support ticket as read from one table row.

use serde::{Deserialize, Serialize};

use super::table::Table;

/// Column names that map table fields onto ticket fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketColumns {
    /// Column holding the ticket body.
    pub text: String,
    /// Column holding the ticket identifier.
    pub id: Option<String>,
    /// Column holding the intake channel (email, phone, chat...).
    pub channel: Option<String>,
    /// Column holding the ticket priority.
    pub priority: Option<String>,
}

impl TicketColumns {
    /// Create a mapping with only the text column set.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_id(mut self, column: impl Into<String>) -> Self {
        self.id = Some(column.into());
        self
    }

    #[must_use]
    pub fn with_channel(mut self, column: impl Into<String>) -> Self {
        self.channel = Some(column.into());
        self
    }

    #[must_use]
    pub fn with_priority(mut self, column: impl Into<String>) -> Self {
        self.priority = Some(column.into());
        self
    }

    /// Every configured column, text first.
    #[must_use]
    pub fn all(&self) -> Vec<&str> {
        std::iter::once(self.text.as_str())
            .chain(self.id.as_deref())
            .chain(self.channel.as_deref())
            .chain(self.priority.as_deref())
            .collect()
    }
}

/// One ticket, owned by the task that processes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub id: Option<String>,
    pub text: String,
    pub channel: Option<String>,
    pub priority: Option<String>,
}

impl Ticket {
    /// Create a ticket with only its text set.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: None,
            text: text.into(),
            channel: None,
            priority: None,
        }
    }

    /// Read row `row` of `table` using the given column mapping.
    ///
    /// A missing text cell yields an empty ticket body.
    #[must_use]
    pub fn from_row(table: &Table, row: usize, columns: &TicketColumns) -> Self {
        let field = |column: &Option<String>| {
            column
                .as_deref()
                .and_then(|name| table.get(row, name))
                .map(ToString::to_string)
        };

        Self {
            id: field(&columns.id),
            text: table
                .get(row, &columns.text)
                .unwrap_or_default()
                .to_string(),
            channel: field(&columns.channel),
            priority: field(&columns.priority),
        }
    }

    /// Extract every row of `table` as tickets, in order.
    #[must_use]
    pub fn all_from(table: &Table, columns: &TicketColumns) -> Vec<Self> {
        (0..table.len())
            .map(|row| Self::from_row(table, row, columns))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        Table::from_text_rows(
            vec![
                "id".into(),
                "texto".into(),
                "canal".into(),
                "prioridade".into(),
            ],
            vec![
                vec!["T-1", "printer jammed", "email", "alta"],
                vec!["T-2", "NaN", "", "baixa"],
            ],
        )
    }

    #[test]
    fn reads_configured_fields() {
        let columns = TicketColumns::new("texto")
            .with_id("id")
            .with_channel("canal")
            .with_priority("prioridade");

        let ticket = Ticket::from_row(&table(), 0, &columns);
        assert_eq!(ticket.id.as_deref(), Some("T-1"));
        assert_eq!(ticket.text, "printer jammed");
        assert_eq!(ticket.channel.as_deref(), Some("email"));
        assert_eq!(ticket.priority.as_deref(), Some("alta"));
    }

    #[test]
    fn unconfigured_columns_are_absent() {
        let ticket = Ticket::from_row(&table(), 0, &TicketColumns::new("texto"));
        assert_eq!(ticket.id, None);
        assert_eq!(ticket.channel, None);
        assert_eq!(ticket.priority, None);
    }

    #[test]
    fn placeholder_values_collapse_to_none() {
        let columns = TicketColumns::new("texto").with_channel("canal");
        let ticket = Ticket::from_row(&table(), 1, &columns);
        assert_eq!(ticket.text, "");
        assert_eq!(ticket.channel, None);
    }

    #[test]
    fn all_lists_text_column_first() {
        let columns = TicketColumns::new("texto").with_priority("prioridade").with_id("id");
        assert_eq!(columns.all(), vec!["texto", "id", "prioridade"]);
    }

    #[test]
    fn all_from_preserves_row_order() {
        let tickets = Ticket::all_from(&table(), &TicketColumns::new("texto").with_id("id"));
        let ids: Vec<_> = tickets.iter().map(|t| t.id.as_deref()).collect();
        assert_eq!(ids, vec![Some("T-1"), Some("T-2")]);
    }
}
