//! Decodes a pipelined batch of server replies as it trickles in over a
//! socket, printing each reply the moment its last byte arrives.
//!
//! The client sent five commands back to back:
//!
//! ```text
//! SET greeting "hello\r\nworld"
//! GET greeting
//! LRANGE queue 0 -1
//! INCR greeting
//! GET missing
//! ```
//!
//! The server answers in order, but the network splits the answers at
//! arbitrary byte offsets: inside a CRLF, inside a bulk payload, between an
//! array header and its elements. The decoder buffers only the unfinished
//! tail, so replies surface as early as possible and an error reply for one
//! command does not disturb the ones after it.
//!
//! Run with
//!
//! ```bash
//! cargo run -p respmodem --example pipelined_replies
//! ```

use respmodem::{Reply, StreamingDecoder};

fn main() {
    // In real life this would come from the network.
    let simulated_stream: [&[u8]; 8] = [
        // 0 – SET reply, start of GET bulk header
        b"+OK\r\n$1",
        // 1 – bulk length ends, payload begins
        b"2\r\nhello\r",
        // 2 – the embedded CRLF is payload, not a terminator
        b"\nworld\r\n*3\r",
        // 3 – LRANGE array header completes, first element
        b"\n$3\r\njob",
        // 4 – remaining elements, one of them a nested array
        b"\r\n*2\r\n:1\r\n:2\r\n",
        // 5 – last element and the INCR error
        b"$0\r\n\r\n-ERR value is not an integer",
        // 6 – error line terminator split across chunks
        b" or out of range\r",
        // 7 – null bulk for the missing key
        b"\n$-1\r\n",
    ];

    let mut decoder = StreamingDecoder::default();

    for (i, chunk) in simulated_stream.iter().enumerate() {
        decoder.feed(chunk);
        println!(
            "chunk {i}: {} bytes buffered, {} arrays open",
            decoder.buffered_len(),
            decoder.depth()
        );

        for event in decoder.by_ref() {
            match event {
                Ok(Reply::Value(value)) => println!("  reply: {value}"),
                Ok(Reply::Error(message)) => println!("  server error: {message}"),
                Err(err) => {
                    eprintln!("  protocol error: {err}");
                    return;
                }
            }
        }
    }

    for event in decoder.finish() {
        if let Err(err) = event {
            eprintln!("stream ended early: {err}");
        }
    }
}
