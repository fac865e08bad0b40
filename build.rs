fn main() {
    // Tauri codegen (context, capabilities) is only needed for the desktop shell
    #[cfg(feature = "app")]
    tauri_build::build();
}
