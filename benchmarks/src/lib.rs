#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

pub mod bfs;
pub mod nn;

#[cfg(test)]
pub mod testing {
    static LOGGER: std::sync::Once = std::sync::Once::new();

    pub fn init_logging() {
        LOGGER.call_once(|| {
            env_logger::builder().is_test(true).init();
        });
    }
}
