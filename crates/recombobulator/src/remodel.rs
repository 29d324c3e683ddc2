//! Date remodeling: strings at `isDate` paths become real dates again.

use tracing::warn;

use crate::config::CollectionPath;
use crate::date::{from_epoch_millis, parse_date};
use crate::document::Document;
use crate::Recombobulator;

impl Recombobulator {
    /// Converts every scalar at a date path into a [`Document::Date`].
    ///
    /// Values that cannot be read as a date are left as they are and logged
    /// at `warn` level.
    pub fn remodel_dates(&self, doc: Document) -> Document {
        self.remodel_dates_at(doc, &CollectionPath::root())
    }

    /// Like [`remodel_dates`](Self::remodel_dates) with `doc` found at `location`.
    pub fn remodel_dates_at(&self, doc: Document, location: &CollectionPath) -> Document {
        let mut path = location.segments().to_vec();
        self.remodel_value(doc, &mut path)
    }

    fn remodel_value(&self, doc: Document, path: &mut Vec<String>) -> Document {
        match doc {
            Document::Array(items) => Document::Array(
                items
                    .into_iter()
                    .map(|item| self.remodel_value(item, path))
                    .collect(),
            ),
            Document::Object(map) => Document::Object(
                map.into_iter()
                    .map(|(name, value)| {
                        path.push(name);
                        let remodeled = self.remodel_value(value, path);
                        let name = path.pop().unwrap_or_default();
                        (name, remodeled)
                    })
                    .collect(),
            ),
            scalar if self.collections().is_date_at(path) => remodel_scalar(scalar, path),
            scalar => scalar,
        }
    }
}

fn remodel_scalar(scalar: Document, path: &[String]) -> Document {
    let parsed = match &scalar {
        Document::Date(date) => Some(*date),
        Document::String(s) => parse_date(s),
        Document::Number(n) => n.as_f64().and_then(from_epoch_millis),
        _ => None,
    };
    match parsed {
        Some(date) => Document::Date(date),
        None => {
            warn!(
                path = %path.join("."),
                value = ?scalar,
                "value is not a valid date and cannot be parsed"
            );
            scalar
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Collections;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn dated() -> Recombobulator {
        Recombobulator::new(
            Collections::new()
                .with_key("dates", "date")
                .with_date("dates.date"),
        )
    }

    #[test]
    fn numbers_are_epoch_millis() {
        let out = dated().remodel_dates(Document::from(json!({"dates": [{"date": 1_000}]})));
        let expected = Utc.timestamp_millis_opt(1_000).unwrap();
        let first = &out.get("dates").and_then(Document::as_array).unwrap()[0];
        assert_eq!(first.get("date").and_then(Document::as_date), Some(&expected));
    }

    #[test]
    fn existing_dates_are_kept() {
        let date = Utc.with_ymd_and_hms(1995, 12, 25, 0, 0, 0).unwrap();
        let element: Document = [("date".to_string(), Document::Date(date))]
            .into_iter()
            .collect();
        let doc: Document = [("dates".to_string(), Document::Array(vec![element]))]
            .into_iter()
            .collect();
        assert_eq!(dated().remodel_dates(doc.clone()), doc);
    }

    #[test]
    fn null_and_bool_are_left_alone() {
        let doc = Document::from(json!({"dates": [{"date": null}, {"date": true}]}));
        assert_eq!(dated().remodel_dates(doc.clone()), doc);
    }

    #[test]
    fn containers_at_a_date_path_are_descended() {
        let r = Recombobulator::new(Collections::new().with_date("when"));
        let doc = Document::from(json!({"when": {"inner": "2018-08-14"}}));
        assert_eq!(r.remodel_dates(doc.clone()), doc);
    }

    #[test]
    fn remodel_at_location() {
        let r = dated();
        let out = r.remodel_dates_at(
            Document::from(json!({"date": "1995-12-25"})),
            &CollectionPath::parse("dates"),
        );
        let expected = Utc.with_ymd_and_hms(1995, 12, 25, 0, 0, 0).unwrap();
        assert_eq!(out.get("date").and_then(Document::as_date), Some(&expected));
    }
}
