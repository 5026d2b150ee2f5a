pub mod clash_yaml;

pub use clash_yaml::parse_clash_yaml;
