/// Externally owned text regions a controller writes its status into.
///
/// Writes are fire-and-forget. Only the matching game has a clock, so
/// `show_elapsed` defaults to doing nothing.
pub trait StatusDisplay {
    fn show_counter(&mut self, text: &str);

    fn show_elapsed(&mut self, _text: &str) {}

    fn show_message(&mut self, text: &str);
}

/// Keeps the last text written to each region.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextDisplay {
    pub counter: String,
    pub elapsed: String,
    pub message: String,
}

impl StatusDisplay for TextDisplay {
    fn show_counter(&mut self, text: &str) {
        self.counter = text.to_string();
    }

    fn show_elapsed(&mut self, text: &str) {
        self.elapsed = text.to_string();
    }

    fn show_message(&mut self, text: &str) {
        self.message = text.to_string();
    }
}
