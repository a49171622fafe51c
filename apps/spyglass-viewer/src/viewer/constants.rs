const DEFAULT_STATUS: &str = "Ready";
const HOME_FILE_ENV: &str = "SPYGLASS_HOME_FILE";
const MAX_DOCUMENT_BYTES: usize = 8 * 1024 * 1024;
const CHARSET_SNIFF_BYTES: usize = 8192;
const LOAD_THREAD_STACK_SIZE: usize = 8 * 1024 * 1024;
const MAX_NAV_LABEL_CHARS: usize = 42;
const LOADING_REPAINT_INTERVAL: Duration = Duration::from_millis(50);
