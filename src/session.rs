use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::form::{Form, FormError};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("cannot read session file: {source}")]
    Csv {
        #[from]
        source: csv::Error,
    },
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum EventError {
    #[error("{0} event needs a target")]
    MissingTarget(&'static str),

    #[error("'{0}' is not a record index")]
    BadIndex(String),
}

#[derive(Debug, Deserialize, Copy, Clone, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Input,
    Submit,
    Delete,
}

#[derive(Debug, Deserialize)]
struct DeserializedEvent {
    event: EventType,
    target: Option<String>,
    value: Option<String>,
}

/// One user interaction with a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    Input { field: String, value: String },
    Submit,
    Delete(usize),
}

impl TryFrom<DeserializedEvent> for FormEvent {
    type Error = EventError;
    fn try_from(deserialized: DeserializedEvent) -> Result<Self, Self::Error> {
        match deserialized.event {
            EventType::Input => Ok(FormEvent::Input {
                field: deserialized.target.ok_or(EventError::MissingTarget("input"))?,
                value: deserialized.value.unwrap_or_default(),
            }),
            EventType::Submit => Ok(FormEvent::Submit),
            EventType::Delete => {
                let target = deserialized
                    .target
                    .ok_or(EventError::MissingTarget("delete"))?;
                let index = target.parse().map_err(|_| EventError::BadIndex(target))?;
                Ok(FormEvent::Delete(index))
            }
        }
    }
}

impl FormEvent {
    pub fn apply(&self, form: &mut dyn Form) -> Result<(), FormError> {
        match self {
            FormEvent::Input { field, value } => form.input(field, value),
            FormEvent::Submit => {
                form.submit();
                Ok(())
            }
            FormEvent::Delete(index) => form.delete(*index),
        }
    }
}

/// Rows that fail to deserialize or convert are dropped with a warning.
pub fn csv_to_event_iterator(path: &Path) -> Result<impl Iterator<Item = FormEvent>, SessionError> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    Ok(reader
        .into_deserialize()
        .enumerate()
        .filter_map(|(row, e): (usize, Result<DeserializedEvent, csv::Error>)| {
            let deserialized = match e {
                Ok(deserialized) => deserialized,
                Err(err) => {
                    warn!(row, %err, "dropped session event");
                    return None;
                }
            };
            match FormEvent::try_from(deserialized) {
                Err(err) => {
                    warn!(row, %err, "dropped session event");
                    None
                }
                Ok(event) => Some(event),
            }
        }))
}

/// Applies events in order. Events the form rejects are skipped. Returns how many applied.
pub fn replay(form: &mut dyn Form, events: impl IntoIterator<Item = FormEvent>) -> usize {
    let mut applied = 0;
    for event in events {
        match event.apply(form) {
            Ok(()) => applied += 1,
            Err(err) => warn!(?event, %err, "dropped session event"),
        }
    }
    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversion::{ConversionForm, INVALID_INPUT_MESSAGE};
    use crate::gold::GoldForm;
    use crate::usd::UsdForm;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_session_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", content).unwrap();
        file
    }

    fn read_events(content: &str) -> Vec<FormEvent> {
        let file = create_session_csv(content);
        csv_to_event_iterator(file.path()).unwrap().collect()
    }

    mod parsing {
        use super::*;

        #[test]
        fn reads_all_event_kinds() {
            let events = read_events(
                "event,target,value\n\
                 input, paid ,\"1,000\"\n\
                 submit,,\n\
                 delete,0,",
            );

            assert_eq!(
                events,
                vec![
                    FormEvent::Input {
                        field: "paid".to_owned(),
                        value: "1,000".to_owned()
                    },
                    FormEvent::Submit,
                    FormEvent::Delete(0),
                ]
            );
        }
        #[test]
        fn input_without_value_is_empty_text() {
            let events = read_events("event,target,value\ninput,weight,");

            assert_eq!(
                events,
                vec![FormEvent::Input {
                    field: "weight".to_owned(),
                    value: String::new()
                }]
            );
        }
        #[test]
        fn bad_rows_are_dropped() {
            let events = read_events(
                "event,target,value\n\
                 click,,\n\
                 delete,first,\n\
                 delete,,\n\
                 input,,5\n\
                 submit,,",
            );

            assert_eq!(events, vec![FormEvent::Submit]);
        }
        #[test]
        fn missing_file_is_an_error() {
            let dir = tempfile::tempdir().unwrap();

            assert!(csv_to_event_iterator(&dir.path().join("missing.csv")).is_err());
        }
        #[test]
        fn bad_index_error() {
            let event = FormEvent::try_from(DeserializedEvent {
                event: EventType::Delete,
                target: Some("-1".to_owned()),
                value: None,
            });

            assert_eq!(event, Err(EventError::BadIndex("-1".to_owned())));
        }
    }

    mod replaying {
        use super::*;

        #[test]
        fn gold_session() {
            let events = read_events(
                "event,target,value\n\
                 input,price,50\n\
                 input,paid,1000\n\
                 submit,,\n\
                 input,price,100\n\
                 submit,,\n\
                 input,price,200\n\
                 submit,,\n\
                 delete,1,",
            );
            let mut form = GoldForm::default();

            assert_eq!(replay(&mut form, events), 8);
            let prices: Vec<f64> = form
                .tracker()
                .positions()
                .iter()
                .map(|p| p.gold_price)
                .collect();
            assert_eq!(prices, vec![50.0, 200.0]);
            assert_eq!(form.tracker().total_gold(), 25000.0);
        }
        #[test]
        fn usd_session_skips_unsupported_events() {
            let events = read_events(
                "event,target,value\n\
                 input,usd,100\n\
                 input,rate,\"60,000\"\n\
                 submit,,\n\
                 delete,0,\n\
                 input,price,5",
            );
            let mut form = UsdForm::default();

            assert_eq!(replay(&mut form, events), 3);
            assert_eq!(form.tracker().transactions().len(), 1);
            assert_eq!(form.tracker().total_toman_spent(), 6_000_000.0);
        }
        #[test]
        fn conversion_session_with_bad_input() {
            let events = read_events(
                "event,target,value\n\
                 input,rate,abc\n\
                 input,xau,2640\n\
                 submit,,",
            );
            let mut form = ConversionForm::default();
            replay(&mut form, events);

            assert_eq!(form.result(), Some(INVALID_INPUT_MESSAGE));
        }
    }

    mod sample_sessions {
        use super::*;
        use std::path::PathBuf;

        fn sample(name: &str) -> Vec<FormEvent> {
            let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
                .join("sessions")
                .join(name);
            csv_to_event_iterator(&path).unwrap().collect()
        }

        #[test]
        fn gold() {
            let mut form = GoldForm::default();

            assert_eq!(replay(&mut form, sample("gold.csv")), 7);
            assert_eq!(
                form.to_string(),
                "Positions\n\
                 [0]\n\
                 Gold Price: 4,400 per mg\n\
                 Gold Bought: 2,000 mg\n\
                 Fee: 150,000\n\
                 Total Paid: 10,150,000\n\
                 \n\
                 Summary\n\
                 Average Gold Price: 4,400 per mg\n\
                 Total Gold Bought: 2,000 mg\n"
            );
        }
        #[test]
        fn usd() {
            let mut form = UsdForm::default();
            replay(&mut form, sample("usd.csv"));

            assert_eq!(form.tracker().total_usd(), 150.0);
            assert_eq!(form.tracker().average_rate(), 61000.0);
            assert_eq!(form.tracker().total_toman_spent(), 9_100_000.0);
        }
        #[test]
        fn convert() {
            let mut form = ConversionForm::default();
            replay(&mut form, sample("convert.csv"));

            assert_eq!(
                form.result(),
                Some("The price of 1 gram of 18-karat gold is approximately 4,519,748.581 Iranian Toman.")
            );
        }
    }
}
