use std::{sync::Arc, thread};

use controlplane::{get_loadbalancer_image, set_loadbalancer_image, ImagePin};

#[test]
fn test_empty_until_set() {
    let pin = ImagePin::new();
    assert_eq!(pin.get(), "");
}

#[test]
fn test_first_set_wins() {
    let pin = ImagePin::new();
    pin.set("appscode/haproxy:1.7.0");
    pin.set("appscode/haproxy:1.8.0");
    pin.set("");
    assert_eq!(pin.get(), "appscode/haproxy:1.7.0");
}

#[test]
fn test_concurrent_set_has_single_winner() {
    for _ in 0..50 {
        let pin = Arc::new(ImagePin::new());
        let handles: Vec<_> = ["x", "y"]
            .into_iter()
            .map(|value| {
                let pin = pin.clone();
                thread::spawn(move || {
                    pin.set(value);
                    pin.get().to_string()
                })
            })
            .collect();

        let observed: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let winner = pin.get().to_string();
        assert!(winner == "x" || winner == "y");
        for value in observed {
            assert_eq!(value, winner);
        }
        for _ in 0..100 {
            assert_eq!(pin.get(), winner);
        }
    }
}

#[test]
fn test_process_wide_image() {
    set_loadbalancer_image("appscode/haproxy:1.7.0-k8s");
    set_loadbalancer_image("appscode/haproxy:latest");
    assert_eq!(get_loadbalancer_image(), "appscode/haproxy:1.7.0-k8s");
}
