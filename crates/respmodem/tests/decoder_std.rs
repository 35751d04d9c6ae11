#![allow(missing_docs)]

mod common;

use common::{PIPELINE, decode_chunks};
use respmodem::{
    DecodeErrorKind, DecoderOptions, Reply, StreamingDecoder, UnknownEncoding, Value,
};

#[test]
fn unknown_encoding_label_is_rejected() {
    let err = DecoderOptions::with_encoding_label("klingon").unwrap_err();
    assert_eq!(
        err,
        UnknownEncoding {
            label: "klingon".to_string()
        }
    );
    assert_eq!(err.to_string(), "unknown encoding: klingon");
}

#[test]
fn encoding_label_is_case_and_space_insensitive() {
    let options = DecoderOptions::with_encoding_label(" UTF-8 ").unwrap();
    assert_eq!(options.encoding, encoding_rs::UTF_8);
}

#[test]
fn replies_display_like_a_client_would() {
    let events = decode_chunks(DecoderOptions::default(), [PIPELINE]);
    let replies: Vec<Reply> = events.into_iter().map(Result::unwrap).collect();
    assert_eq!(replies.len(), 6);
    assert_eq!(replies[0].to_string(), "\"PONG\"");
    assert!(replies[3].is_error());
    assert_eq!(
        replies[4].clone().into_value(),
        Some(Value::Array(vec![
            Value::Array(vec![Value::Integer(1), Value::Integer(2)]),
            Value::Array(vec![]),
        ]))
    );
    assert_eq!(
        replies[5].clone().into_value().and_then(|v| v.as_integer()),
        Some(i64::MIN)
    );
}

#[test]
fn state_queries_follow_partial_input() {
    let mut decoder = StreamingDecoder::default();
    assert!(decoder.is_idle());

    decoder.feed(b"*2\r\n*1\r\n$5\r\nab");
    assert_eq!(decoder.next(), None);
    assert_eq!(decoder.depth(), 2);
    assert_eq!(decoder.buffered_len(), 2);
    assert!(!decoder.is_idle());

    decoder.feed(b"cde\r\n:9\r\n");
    let reply = decoder.next().unwrap().unwrap();
    assert_eq!(
        reply,
        Reply::Value(Value::Array(vec![
            Value::Array(vec![Value::from("abcde")]),
            Value::Integer(9),
        ]))
    );
    assert!(decoder.is_idle());
    assert_eq!(decoder.depth(), 0);
}

#[test]
fn reset_starts_a_fresh_stream() {
    let mut decoder = StreamingDecoder::default();
    decoder.feed(b"*3\r\n:1\r\n$4\r\nab");
    decoder.reset();
    assert!(decoder.is_idle());

    decoder.feed(b"+fresh\r\n");
    assert_eq!(
        decoder.next(),
        Some(Ok(Reply::Value(Value::from("fresh"))))
    );
}

#[test]
fn finish_drains_queued_replies_before_the_truncation_error() {
    let mut decoder = StreamingDecoder::default();
    decoder.feed(b":1\r\n:2\r\n*2\r\n:3\r\n");
    let events: Vec<_> = decoder.finish().collect();
    assert_eq!(events.len(), 3);
    assert_eq!(events[0], Ok(Reply::Value(Value::Integer(1))));
    assert_eq!(events[1], Ok(Reply::Value(Value::Integer(2))));
    let err = events[2].clone().unwrap_err();
    assert_eq!(err.kind, DecodeErrorKind::UnexpectedEndOfInput { buffered: 0 });
}

#[test]
fn options_are_retained() {
    let decoder = StreamingDecoder::new(DecoderOptions {
        raw_payloads: true,
        max_nesting_depth: Some(8),
        ..DecoderOptions::default()
    });
    assert!(decoder.options().raw_payloads);
    assert_eq!(decoder.options().max_nesting_depth, Some(8));
    assert_eq!(decoder.options().max_bulk_length, None);
}
