use picture_frame::config::Configuration;
use std::path::PathBuf;
use std::time::Duration;

#[test]
fn defaults_match_stock_frame() {
    let cfg: Configuration = serde_yaml::from_str("{}").unwrap();
    assert_eq!(cfg.images_folder, PathBuf::from("./img"));
    assert_eq!(cfg.default_image, "flair.png");
    assert_eq!(cfg.delay, Duration::from_millis(5000));
    assert_eq!(cfg.bind_address.port(), 5000);
    assert_eq!(cfg.power.restart_command, ["sudo", "reboot"]);
    assert_eq!(cfg.power.shutdown_command, ["sudo", "shutdown"]);
    assert!(cfg.validated().is_ok());
}

#[test]
fn parse_kebab_case_config() {
    let yaml = r#"
images-folder: "/srv/frame/img"
default-image: "welcome.jpg"
asset-dir: "/srv/frame/www"
bind-address: "127.0.0.1:8080"
delay: 1500ms
channel-capacity: 2
power:
  restart-command: ["systemctl", "reboot"]
"#;
    let cfg: Configuration = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(cfg.images_folder, PathBuf::from("/srv/frame/img"));
    assert_eq!(cfg.default_image, "welcome.jpg");
    assert_eq!(cfg.delay, Duration::from_millis(1500));
    assert_eq!(cfg.bind_address.to_string(), "127.0.0.1:8080");
    assert_eq!(cfg.channel_capacity, 2);
    assert_eq!(cfg.power.restart_command, ["systemctl", "reboot"]);
    assert_eq!(cfg.power.shutdown_command, ["sudo", "shutdown"]);
    assert_eq!(cfg.logo_path(), PathBuf::from("/srv/frame/www/logo.png"));
}

#[test]
fn zero_delay_is_rejected() {
    let cfg: Configuration = serde_yaml::from_str("delay: 0s").unwrap();
    let err = cfg.validated().unwrap_err();
    assert!(err.to_string().contains("delay"));
}

#[test]
fn sentinel_must_be_a_bare_name() {
    let cfg: Configuration = serde_yaml::from_str("default-image: \"../flair.png\"").unwrap();
    assert!(cfg.validated().is_err());
    let cfg: Configuration = serde_yaml::from_str("default-image: \"  \"").unwrap();
    assert!(cfg.validated().is_err());
}

#[test]
fn empty_power_command_is_rejected() {
    let yaml = r#"
power:
  shutdown-command: []
"#;
    let cfg: Configuration = serde_yaml::from_str(yaml).unwrap();
    assert!(cfg.validated().is_err());
}

#[test]
fn from_yaml_file_reads_disk() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("config.yaml");
    std::fs::write(&path, "delay: 2s\n").unwrap();
    let cfg = Configuration::from_yaml_file(&path).unwrap();
    assert_eq!(cfg.delay, Duration::from_secs(2));
    assert!(Configuration::from_yaml_file(tmp.path().join("missing.yaml")).is_err());
}
