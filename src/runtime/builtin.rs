/// Destination for trace records. Records arrive in post-order, one per
/// evaluated operator node.
pub(crate) trait TraceSink {
    fn trace(&mut self, label: &str, value: i64);
}

/// Prints `label = value` lines to stdout.
pub(crate) struct ConsoleSink;

impl TraceSink for ConsoleSink {
    fn trace(&mut self, label: &str, value: i64) {
        println!("{label} = {value}");
    }
}

/// Forwards records to the `log` facade under the `trace` target.
pub(crate) struct LogSink;

impl TraceSink for LogSink {
    fn trace(&mut self, label: &str, value: i64) {
        log::info!(target: "trace", "{label} = {value}");
    }
}

impl TraceSink for Vec<(String, i64)> {
    fn trace(&mut self, label: &str, value: i64) {
        self.push((label.to_string(), value));
    }
}

impl<F> TraceSink for F
where
    F: FnMut(&str, i64),
{
    fn trace(&mut self, label: &str, value: i64) {
        self(label, value)
    }
}
