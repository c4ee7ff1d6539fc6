mod channel;
mod format;
mod tx;
