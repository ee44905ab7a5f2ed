//! Ошибки конфигурации
//!
//! Тайминги и дистанции проверяются один раз, при сборке bundle'а актора:
//! невалидное окно не доживает до рантайма в виде отрицательного ожидания.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{field} must be > 0, got {value}")]
    NonPositive { field: &'static str, value: f32 },

    #[error("{field} must be >= 0, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("{window} ({window_value}) exceeds {duration} ({duration_value})")]
    WindowExceedsDuration {
        window: &'static str,
        window_value: f32,
        duration: &'static str,
        duration_value: f32,
    },

    #[error("{inner} ({inner_value}) must not exceed {outer} ({outer_value})")]
    RangeOrder {
        inner: &'static str,
        inner_value: f32,
        outer: &'static str,
        outer_value: f32,
    },

    #[error("Tuning parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

pub(crate) fn ensure_positive(field: &'static str, value: f32) -> Result<()> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

pub(crate) fn ensure_non_negative(field: &'static str, value: f32) -> Result<()> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

/// Окно (`window`) помещается в длительность (`duration`).
pub(crate) fn ensure_within(
    window: &'static str,
    window_value: f32,
    duration: &'static str,
    duration_value: f32,
) -> Result<()> {
    if window_value <= duration_value {
        Ok(())
    } else {
        Err(ConfigError::WindowExceedsDuration {
            window,
            window_value,
            duration,
            duration_value,
        })
    }
}

/// `inner` не больше `outer` (вложенные дистанции, границы strike окна).
pub(crate) fn ensure_ordered(
    inner: &'static str,
    inner_value: f32,
    outer: &'static str,
    outer_value: f32,
) -> Result<()> {
    if inner_value <= outer_value {
        Ok(())
    } else {
        Err(ConfigError::RangeOrder {
            inner,
            inner_value,
            outer,
            outer_value,
        })
    }
}
