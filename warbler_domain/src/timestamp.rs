use time::macros::format_description;

#[derive(sqlx::Type, Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
#[sqlx(transparent)]
pub struct Timestamp(pub time::OffsetDateTime);

impl Timestamp {
    /// Day-level rendering used on message listings, e.g. `12 October 2019`.
    pub fn date(&self) -> String {
        self.0
            .format(format_description!("[day] [month repr:long] [year]"))
            .unwrap_or_default()
    }
}
