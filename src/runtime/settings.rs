use crate::config;

pub fn load_settings() -> config::Settings {
    match config::Settings::load() {
        Ok(s) => {
            if let Err(msg) = s.validate() {
                // Logging is not up yet; stderr still reaches the user here.
                eprintln!("lyrebird: invalid config, using defaults: {msg}");
                config::Settings::default()
            } else {
                s
            }
        }
        Err(e) => {
            // Config is optional; failures should not prevent the app from starting.
            eprintln!("lyrebird: failed to load config, using defaults: {e}");
            config::Settings::default()
        }
    }
}
