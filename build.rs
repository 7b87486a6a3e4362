#[cfg(windows)]
fn main() {
    let res = winres::WindowsResource::new();
    res.compile().expect("failed to embed windows resources");
}

#[cfg(not(windows))]
fn main() {}
