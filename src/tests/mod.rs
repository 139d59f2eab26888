mod round_trips;
mod ubx_oem;


use log::LevelFilter;
use std::sync::{Arc, Mutex, Once};

use crate::prelude::*;

static INIT: Once = Once::new();

pub fn init_logger() {
    INIT.call_once(|| {
        env_logger::builder()
            .is_test(true)
            .filter_level(LevelFilter::Debug)
            .init();
    });
}

/// Collects every [ErrorEvent]
pub fn errors<F: Framer, D: Decoder>(parser: &mut Parser<F, D>) -> Arc<Mutex<Vec<ErrorEvent>>> {
    let errors = Arc::new(Mutex::new(Vec::new()));
    let shared = errors.clone();
    parser.on_error(move |event| shared.lock().unwrap().push(event.clone()));
    errors
}

/// Collects a copy of every decoded message of type `T`
pub fn capture<T, F, D>(parser: &mut Parser<F, D>) -> Arc<Mutex<Vec<T>>>
where
    T: Body + Clone + Send + 'static,
    F: Framer,
    D: Decoder,
{
    let messages = Arc::new(Mutex::new(Vec::new()));
    let shared = messages.clone();
    parser.on_message(move |msg| {
        if let Some(body) = msg.downcast_ref::<T>() {
            shared.lock().unwrap().push(body.clone());
        }
        Ok(())
    });
    messages
}
