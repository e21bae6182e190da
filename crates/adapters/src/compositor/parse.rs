use thiserror::Error;

/// One filter function from an expression, with its amount normalised:
/// fractions for the percentage functions, degrees for hue rotation and
/// pixels for blur.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterOp {
    Grayscale(f32),
    Sepia(f32),
    Saturate(f32),
    HueRotate(f32),
    Brightness(f32),
    Contrast(f32),
    Blur(f32),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterSyntaxError {
    #[error("unknown filter function `{0}`")]
    UnknownFunction(String),
    #[error("expected `(` after `{0}`")]
    MissingOpenParen(String),
    #[error("unterminated argument for `{0}`")]
    Unterminated(String),
    #[error("invalid argument `{argument}` for `{function}`")]
    InvalidArgument { function: String, argument: String },
}

pub fn parse_filter_list(expression: &str) -> Result<Vec<FilterOp>, FilterSyntaxError> {
    let mut ops = Vec::new();
    let mut rest = expression.trim_start();

    while !rest.is_empty() {
        let name_len = rest
            .find(|ch: char| !(ch.is_ascii_alphabetic() || ch == '-'))
            .unwrap_or(rest.len());
        let name = &rest[..name_len];
        if name.is_empty() {
            return Err(FilterSyntaxError::UnknownFunction(
                rest.chars().take(16).collect(),
            ));
        }
        let after_name = rest[name_len..].trim_start();
        let Some(after_paren) = after_name.strip_prefix('(') else {
            return Err(FilterSyntaxError::MissingOpenParen(name.to_string()));
        };
        let Some(close) = after_paren.find(')') else {
            return Err(FilterSyntaxError::Unterminated(name.to_string()));
        };
        let argument = after_paren[..close].trim();
        ops.push(parse_function(name, argument)?);
        rest = after_paren[close + 1..].trim_start();
    }

    Ok(ops)
}

fn parse_function(name: &str, argument: &str) -> Result<FilterOp, FilterSyntaxError> {
    let invalid = || FilterSyntaxError::InvalidArgument {
        function: name.to_string(),
        argument: argument.to_string(),
    };

    match name.to_ascii_lowercase().as_str() {
        "grayscale" => amount(argument).map(|v| FilterOp::Grayscale(v.min(1.0))).ok_or_else(invalid),
        "sepia" => amount(argument).map(|v| FilterOp::Sepia(v.min(1.0))).ok_or_else(invalid),
        "saturate" => amount(argument).map(FilterOp::Saturate).ok_or_else(invalid),
        "brightness" => amount(argument).map(FilterOp::Brightness).ok_or_else(invalid),
        "contrast" => amount(argument).map(FilterOp::Contrast).ok_or_else(invalid),
        "hue-rotate" => angle(argument).map(FilterOp::HueRotate).ok_or_else(invalid),
        "blur" => length(argument).map(FilterOp::Blur).ok_or_else(invalid),
        _ => Err(FilterSyntaxError::UnknownFunction(name.to_string())),
    }
}

/// `50%` or `0.5`; negative amounts are invalid.
fn amount(argument: &str) -> Option<f32> {
    let value = match argument.strip_suffix('%') {
        Some(percent) => number(percent)? / 100.0,
        None => number(argument)?,
    };
    (value >= 0.0).then_some(value)
}

fn angle(argument: &str) -> Option<f32> {
    if argument == "0" {
        return Some(0.0);
    }
    if let Some(value) = argument.strip_suffix("deg") {
        return number(value);
    }
    if let Some(value) = argument.strip_suffix("turn") {
        return number(value).map(|turns| turns * 360.0);
    }
    if let Some(value) = argument.strip_suffix("rad") {
        return number(value).map(f32::to_degrees);
    }
    None
}

fn length(argument: &str) -> Option<f32> {
    let value = match argument.strip_suffix("px") {
        Some(pixels) => number(pixels)?,
        None if argument == "0" => 0.0,
        None => return None,
    };
    (value >= 0.0).then_some(value)
}

fn number(text: &str) -> Option<f32> {
    text.trim().parse::<f32>().ok().filter(|value| value.is_finite())
}
