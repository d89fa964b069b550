extern crate winresource;

fn main() {
    if std::env::var("CARGO_CFG_TARGET_OS").map_or(false, |os| os == "windows") {
        let mut res = winresource::WindowsResource::new();
        res.set("FileDescription", "CS3410Project .fs shell association");
        res.set("ProductName", "CS3410Project");
        res.compile().unwrap();
    }
}
