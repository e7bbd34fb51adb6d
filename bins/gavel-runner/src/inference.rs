/// Value shape inference over the first fixture's inputs.
///
/// The shapes drive solution template generation and are assumed to hold for
/// every fixture in the set — a documented heuristic, not verified against
/// later fixtures.
use gavel_common::types::ValueShape;

/// One shape per input value, in input order.
pub fn infer_shapes(inputs: &[String]) -> Vec<ValueShape> {
    inputs.iter().map(|value| infer_shape(value)).collect()
}

/// Classify one raw value. Precedence: bracketed list (nested bracket →
/// matrix, quote inside → string list, else int list), then quoted string,
/// then numeric literal, then plain string fallback.
pub fn infer_shape(value: &str) -> ValueShape {
    let v = value.trim();

    if v.starts_with('[') && v.ends_with(']') {
        if v[1..].contains('[') {
            ValueShape::MatrixInt
        } else if v.contains('"') {
            ValueShape::ListStr
        } else {
            ValueShape::ListInt
        }
    } else if v.len() >= 2 && v.starts_with('"') && v.ends_with('"') {
        ValueShape::Str
    } else if is_numeric_literal(v) {
        ValueShape::Int
    } else {
        ValueShape::Str
    }
}

fn is_numeric_literal(v: &str) -> bool {
    // f64 parsing accepts "inf"/"nan"; those are words, not literals here.
    !v.is_empty() && !v.contains(|c: char| c.is_ascii_alphabetic()) && v.parse::<f64>().is_ok()
}
