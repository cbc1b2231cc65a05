use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::Handle;

const PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} | {h({l}):5.5} | {t} | {m}{n}";

/// Console logging at `level`. `None` when a logger is already installed.
pub fn init(level: LevelFilter) -> Option<Handle> {
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(PATTERN)))
        .build();
    match Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(level))
    {
        Ok(config) => log4rs::init_config(config).ok(),
        Err(_) => None,
    }
}

/// Swap in the configuration from a log4rs YAML file.
pub fn load_config_file(handle: &Handle, path: &str) -> Result<(), String> {
    match log4rs::config::load_config_file(path, Default::default()) {
        Ok(config) => {
            handle.set_config(config);
            Ok(())
        }
        Err(e) => Err(format!(
            "(load_config_file) could not parse log config file [{}]: {}",
            path, e
        )),
    }
}
