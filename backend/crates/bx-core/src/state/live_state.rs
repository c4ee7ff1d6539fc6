use crate::{StateCell, StateReader, StateWriter};

/// Read side of the process-wide explorer state handed to request handlers.
#[derive(Clone)]
pub struct LiveState {
    pub height: StateReader<u64>,
    pub price: StateReader<f64>,
    pub mempool_count: StateReader<u64>,
}

/// Write side, split up between the tasks that own each value.
pub struct LiveStateWriters {
    pub height: StateWriter<u64>,
    pub price: StateWriter<f64>,
    pub mempool_count: StateWriter<u64>,
}

impl LiveState {
    pub fn new(height: u64, price: f64) -> (LiveStateWriters, LiveState) {
        let (height_writer, height_reader) = StateCell::new(height);
        let (price_writer, price_reader) = StateCell::new(price);
        let (mempool_writer, mempool_reader) = StateCell::new(0u64);

        (
            LiveStateWriters {
                height: height_writer,
                price: price_writer,
                mempool_count: mempool_writer,
            },
            LiveState {
                height: height_reader,
                price: price_reader,
                mempool_count: mempool_reader,
            },
        )
    }
}
