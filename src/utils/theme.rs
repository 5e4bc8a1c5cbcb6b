/// Preferencia de tema oscuro del sistema (`prefers-color-scheme: dark`)
pub fn prefers_dark_mode() -> bool {
    web_sys::window()
        .and_then(|w| w.match_media("(prefers-color-scheme: dark)").ok())
        .flatten()
        .map(|mq| mq.matches())
        .unwrap_or(false)
}
