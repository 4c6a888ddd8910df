use jsoncel::ui::app::App;

fn main() {
    env_logger::init();

    dioxus::LaunchBuilder::desktop()
        .with_cfg(
            dioxus::desktop::Config::new().with_window(
                dioxus::desktop::WindowBuilder::new()
                    .with_title("JsonCel")
                    .with_inner_size(dioxus::desktop::LogicalSize::new(1400.0, 800.0)),
            ),
        )
        .launch(App);
}
