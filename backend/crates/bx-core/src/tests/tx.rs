use crate::{CoreError, EventEnvelope, Tx};

#[test]
fn given_partial_record_when_decoded_then_missing_fields_default() {
    let tx = Tx::from_payload(r#"{"hash":"abcd","total_out":5000,"extra":[1,2,3]}"#).unwrap();

    assert_eq!(tx.hash, "abcd");
    assert_eq!(tx.total_out, 5000);
    assert_eq!(tx.total_in, 0);
    assert_eq!(tx.size, 0);
}

#[test]
fn given_garbage_when_decoded_then_malformed_payload() {
    let result = Tx::from_payload("not json");

    assert!(matches!(result, Err(CoreError::MalformedPayload { .. })));
}

#[test]
fn given_empty_hash_when_decoded_then_malformed_payload() {
    let result = Tx::from_payload(r#"{"hash":""}"#);

    assert!(matches!(result, Err(CoreError::MalformedPayload { .. })));
}

#[test]
fn test_price_envelope_payload() {
    let envelope = EventEnvelope::price(612.5);

    assert_eq!(envelope.payload(), r#"{"t": "price", "price": 612.5}"#);
}
