use alloc::{boxed::Box, string::String, vec::Vec};

use quickcheck::{Arbitrary, Gen};

use crate::Value;

/// Arbitrary reply values that survive a trip through the default decoder.
///
/// Roots are never error lines (those surface as `Reply::Error`), and error
/// elements never contain CR or LF.
impl Arbitrary for Value {
    fn arbitrary(g: &mut Gen) -> Self {
        fn gen_scalar(g: &mut Gen, nested: bool) -> Value {
            let choices = if nested { 4 } else { 3 };
            match usize::arbitrary(g) % choices {
                0 => Value::Null,
                1 => Value::Integer(i64::arbitrary(g)),
                2 => Value::String(String::arbitrary(g)),
                _ => {
                    let mut message = String::arbitrary(g);
                    message.retain(|c| c != '\r' && c != '\n');
                    Value::Error(message)
                }
            }
        }

        fn gen_val(g: &mut Gen, depth: usize, nested: bool) -> Value {
            if depth == 0 || usize::arbitrary(g) % 3 != 0 {
                return gen_scalar(g, nested);
            }
            let len = usize::arbitrary(g) % 4;
            let mut items = Vec::with_capacity(len);
            for _ in 0..len {
                items.push(gen_val(g, depth - 1, true));
            }
            Value::Array(items)
        }

        let depth = usize::arbitrary(g) % 5;
        gen_val(g, depth, false)
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        match self {
            Value::Array(items) => {
                let items = items.clone();
                let halves = if items.len() > 1 {
                    let (a, b) = items.split_at(items.len() / 2);
                    alloc::vec![Value::Array(a.to_vec()), Value::Array(b.to_vec())]
                } else {
                    Vec::new()
                };
                let elements = items.into_iter().filter(|v| !v.is_error());
                Box::new(halves.into_iter().chain(elements))
            }
            Value::String(s) => Box::new(s.shrink().map(Value::String)),
            Value::Integer(i) => Box::new(i.shrink().map(Value::Integer)),
            Value::Null | Value::Bytes(_) | Value::Error(_) => quickcheck::empty_shrinker(),
        }
    }
}
