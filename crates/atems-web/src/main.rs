//! Browser entry point for the ATEMS web interface

fn main() {
    leptos::mount::mount_to_body(atems_web::App);
}
