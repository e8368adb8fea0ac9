use std::{num::NonZeroUsize, sync::Mutex};

use log::warn;
use lru::LruCache;
use regex::Regex;

use crate::{
    ast::ExpressionType,
    functions::{FilterFunction, FilterValue},
    value::Value,
};

/// Compiled patterns kept per function instance.
const CACHE_CAPACITY: NonZeroUsize = NonZeroUsize::new(128).unwrap();

/// Rewrite an I-Regexp (RFC 9485) as a `regex` crate pattern.
///
/// The only difference that matters is `.`, which in I-Regexp matches
/// anything but line feed and carriage return.
fn map_iregexp(pattern: &str) -> String {
    let mut mapped = String::with_capacity(pattern.len());
    let mut escaped = false;
    let mut in_class = false;

    for ch in pattern.chars() {
        if escaped {
            mapped.push(ch);
            escaped = false;
            continue;
        }
        match ch {
            '\\' => {
                mapped.push(ch);
                escaped = true;
            }
            '[' if !in_class => {
                in_class = true;
                mapped.push(ch);
            }
            ']' if in_class => {
                in_class = false;
                mapped.push(ch);
            }
            '.' if !in_class => mapped.push_str(r"[^\n\r]"),
            _ => mapped.push(ch),
        }
    }
    mapped
}

/// Least recently used patterns are evicted first.
#[derive(Debug)]
struct PatternCache {
    patterns: Mutex<LruCache<String, Option<Regex>>>,
}

impl Default for PatternCache {
    fn default() -> Self {
        PatternCache {
            patterns: Mutex::new(LruCache::new(CACHE_CAPACITY)),
        }
    }
}

impl PatternCache {
    fn compile(pattern: &str, full_match: bool) -> Option<Regex> {
        let mapped = map_iregexp(pattern);
        let source = if full_match {
            format!("^(?:{})$", mapped)
        } else {
            mapped
        };
        match Regex::new(&source) {
            Ok(re) => Some(re),
            Err(e) => {
                warn!("invalid I-Regexp pattern {:?}: {}", pattern, e);
                None
            }
        }
    }

    fn is_match(&self, pattern: &str, subject: &str, full_match: bool) -> bool {
        let Ok(mut patterns) = self.patterns.lock() else {
            return Self::compile(pattern, full_match).is_some_and(|re| re.is_match(subject));
        };
        patterns
            .get_or_insert_ref(pattern, || Self::compile(pattern, full_match))
            .as_ref()
            .is_some_and(|re| re.is_match(subject))
    }
}

fn string_args<'a>(args: &'a [FilterValue<'_>]) -> Option<(&'a str, &'a str)> {
    match (
        args.first().and_then(FilterValue::as_value),
        args.get(1).and_then(FilterValue::as_value),
    ) {
        (Some(Value::String(subject)), Some(Value::String(pattern))) => Some((subject, pattern)),
        _ => None,
    }
}

/// `match(string, pattern)` - true if the whole string matches.
#[derive(Debug, Default)]
pub struct Match {
    cache: PatternCache,
}

impl FilterFunction for Match {
    fn arg_types(&self) -> &[ExpressionType] {
        &[ExpressionType::Value, ExpressionType::Value]
    }

    fn return_type(&self) -> ExpressionType {
        ExpressionType::Logical
    }

    fn call<'v>(&self, args: Vec<FilterValue<'v>>) -> FilterValue<'v> {
        let matched = string_args(&args)
            .is_some_and(|(subject, pattern)| self.cache.is_match(pattern, subject, true));
        FilterValue::logical(matched)
    }
}

/// `search(string, pattern)` - true if some substring matches.
#[derive(Debug, Default)]
pub struct Search {
    cache: PatternCache,
}

impl FilterFunction for Search {
    fn arg_types(&self) -> &[ExpressionType] {
        &[ExpressionType::Value, ExpressionType::Value]
    }

    fn return_type(&self) -> ExpressionType {
        ExpressionType::Logical
    }

    fn call<'v>(&self, args: Vec<FilterValue<'v>>) -> FilterValue<'v> {
        let found = string_args(&args)
            .is_some_and(|(subject, pattern)| self.cache.is_match(pattern, subject, false));
        FilterValue::logical(found)
    }
}
