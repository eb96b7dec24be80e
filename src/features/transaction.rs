use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub(crate) enum TransactionError {
    #[error("Transaction id must not be empty")]
    EmptyId,
}

type TransactionResult<T> = anyhow::Result<T, TransactionError>;

/// Caller-assigned record identifier, also the key the record is stored under
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    pub(crate) fn new(id: impl Into<String>) -> TransactionResult<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(TransactionError::EmptyId);
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single money-transfer event. Written once, never updated.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    #[serde(rename = "tranID")]
    id: TransactionId,

    #[serde(default)]
    sender_name: String,

    #[serde(default)]
    sender_country: String,

    #[serde(default)]
    receiver_name: String,

    #[serde(default)]
    receiver_country: String,

    /// Stored exactly as the caller gave it; empty when unknown
    #[serde(default)]
    amount: String,
}

impl TransactionRecord {
    pub(crate) fn new(
        id: TransactionId,
        sender_name: &str,
        sender_country: &str,
        receiver_name: &str,
        receiver_country: &str,
        amount: &str,
    ) -> Self {
        Self {
            id,
            sender_name: sender_name.to_owned(),
            sender_country: sender_country.to_owned(),
            receiver_name: receiver_name.to_owned(),
            receiver_country: receiver_country.to_owned(),
            amount: amount.to_owned(),
        }
    }

    pub fn id(&self) -> &TransactionId {
        &self.id
    }

    pub fn sender_name(&self) -> &str {
        &self.sender_name
    }

    pub fn sender_country(&self) -> &str {
        &self.sender_country
    }

    pub fn receiver_name(&self) -> &str {
        &self.receiver_name
    }

    pub fn receiver_country(&self) -> &str {
        &self.receiver_country
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    /// Get the transaction's amount as a decimal, `None` when it is empty or
    /// does not fit a `Decimal`.
    pub fn get_amount(&self) -> Option<Decimal> {
        Decimal::from_str(&self.amount).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use test_case::test_case;

    fn record(amount: &str) -> TransactionRecord {
        TransactionRecord::new(
            TransactionId::new("tx1").unwrap(),
            "Alice",
            "US",
            "Bob",
            "DE",
            amount,
        )
    }

    #[test]
    fn empty_id_is_rejected() {
        assert_eq!(TransactionId::new(""), Err(TransactionError::EmptyId));
    }

    #[test_case("100", Some(dec!(100)) ; "whole")]
    #[test_case("12.3456", Some(dec!(12.3456)) ; "fractional")]
    #[test_case("", None ; "empty")]
    fn amount_is_read_as_decimal(amount: &str, expected: Option<Decimal>) {
        assert_eq!(record(amount).get_amount(), expected);
    }

    #[test_case("123456789012345678901234567890123" ; "beyond decimal precision")]
    #[test_case("1_000" ; "underscore separator")]
    #[test_case("1e3" ; "exponent")]
    #[test_case("abc" ; "letters")]
    fn amount_text_is_kept_verbatim(amount: &str) {
        let bytes = serde_json::to_vec(&record(amount)).unwrap();
        let parsed: TransactionRecord = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed.amount(), amount);
    }

    #[test]
    fn oversized_amount_has_no_decimal_value() {
        assert_eq!(
            record("123456789012345678901234567890123").get_amount(),
            None
        );
    }

    #[test]
    fn serializes_with_ledger_field_names() {
        let json = serde_json::to_value(record("100")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "tranID": "tx1",
                "senderName": "Alice",
                "senderCountry": "US",
                "receiverName": "Bob",
                "receiverCountry": "DE",
                "amount": "100",
            })
        );
    }

    #[test]
    fn missing_optional_fields_decode_as_empty() {
        let parsed: TransactionRecord =
            serde_json::from_str(r#"{"tranID":"tr1","senderName":"Alice","senderCountry":"US"}"#)
                .unwrap();

        assert_eq!(parsed.id().as_str(), "tr1");
        assert_eq!(parsed.sender_name(), "Alice");
        assert_eq!(parsed.sender_country(), "US");
        assert_eq!(parsed.receiver_name(), "");
        assert_eq!(parsed.receiver_country(), "");
        assert_eq!(parsed.amount(), "");
    }

    #[test]
    fn unescaped_characters_stay_inside_their_field() {
        let record = TransactionRecord::new(
            TransactionId::new("tx1").unwrap(),
            r#"Alice", "amount": "999"#,
            "US",
            "",
            "",
            "",
        );

        let bytes = serde_json::to_vec(&record).unwrap();
        let parsed: TransactionRecord = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed.sender_name(), r#"Alice", "amount": "999"#);
        assert_eq!(parsed.amount(), "");
    }
}
