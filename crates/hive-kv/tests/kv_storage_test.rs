//! Storage contract tests against the in-memory backend.

use chrono::{Duration, Utc};

use hive_core::ErrorKind;
use hive_core::traits::Repository;
use hive_core::types::{NamePattern, Page, Sort, SortDirection};
use hive_entity::{
    Command, Device, DeviceClass, DeviceFilter, DeviceSortField, Equipment, Network,
    NetworkFilter, NetworkSortField, Notification, User, UserRole,
};
use hive_entity::repository::{
    DeviceClassRepository, DeviceRepository, NetworkRepository, NotificationRepository,
    CommandRepository, UserRepository,
};
use hive_kv::KvStore;

#[tokio::test]
async fn test_persist_assigns_id_and_round_trips() {
    let storage = KvStore::new().storage();

    let mut device = Device::new("guid-1", "key-1", "Thermostat");
    device.status = Some("online".into());
    device.data = Some(serde_json::json!({"floor": 2}));

    let saved = storage.devices.persist(device.clone()).await.unwrap();
    assert!(saved.id.is_some());

    let found = storage.devices.find(saved.id.unwrap()).await.unwrap().unwrap();
    assert_eq!(found, saved);
    assert_eq!(found.name, device.name);
    assert_eq!(found.data, device.data);

    let by_guid = storage.devices.find_by_guid("guid-1").await.unwrap().unwrap();
    assert_eq!(by_guid, saved);
}

#[tokio::test]
async fn test_find_by_guid_and_key_requires_exact_key() {
    let storage = KvStore::new().storage();
    storage
        .devices
        .persist(Device::new("guid-1", "key-1", "Lamp"))
        .await
        .unwrap();

    assert!(storage.devices.find_by_guid_and_key("guid-1", "key-1").await.unwrap().is_some());
    assert!(storage.devices.find_by_guid_and_key("guid-1", "KEY-1").await.unwrap().is_none());
    assert!(storage.devices.find_by_guid_and_key("guid-2", "key-1").await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_guid_is_conflict() {
    let storage = KvStore::new().storage();
    storage.devices.persist(Device::new("g", "k", "A")).await.unwrap();
    let err = storage.devices.persist(Device::new("g", "k", "B")).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[tokio::test]
async fn test_update_keeps_id_and_guid_index() {
    let storage = KvStore::new().storage();
    let mut saved = storage.devices.persist(Device::new("g", "k", "A")).await.unwrap();
    saved.name = "B".into();
    let updated = storage.devices.persist(saved.clone()).await.unwrap();
    assert_eq!(updated.id, saved.id);
    assert_eq!(storage.devices.find_by_guid("g").await.unwrap().unwrap().name, "B");

    assert!(storage.devices.delete_by_guid("g").await.unwrap());
    assert!(storage.devices.find_by_guid("g").await.unwrap().is_none());
    assert!(!storage.devices.delete_by_guid("g").await.unwrap());
}

#[tokio::test]
async fn test_network_name_versus_name_pattern() {
    let storage = KvStore::new().storage();
    for name in ["Foo", "Football", "Bar"] {
        storage.networks.persist(Network::named(name)).await.unwrap();
    }

    let exact = storage
        .networks
        .list(
            &NetworkFilter {
                name: Some("Foo".into()),
                ..Default::default()
            },
            Sort::default(),
            Page::default(),
        )
        .await
        .unwrap();
    assert_eq!(exact.len(), 1);
    assert_eq!(exact[0].name, "Foo");

    let pattern = storage
        .networks
        .list(
            &NetworkFilter {
                name_pattern: Some(NamePattern::parse("Fo").unwrap()),
                ..Default::default()
            },
            Sort::default(),
            Page::default(),
        )
        .await
        .unwrap();
    let names: Vec<_> = pattern.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, vec!["Foo", "Football"]);
}

#[tokio::test]
async fn test_network_sort_and_page() {
    let storage = KvStore::new().storage();
    for name in ["b", "c", "a", "d"] {
        storage.networks.persist(Network::named(name)).await.unwrap();
    }

    let page = storage
        .networks
        .list(
            &NetworkFilter::default(),
            Sort::new(NetworkSortField::Name, SortDirection::Desc),
            Page::new(Some(2), Some(1)),
        )
        .await
        .unwrap();
    let names: Vec<_> = page.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, vec!["c", "b"]);
}

#[tokio::test]
async fn test_network_names_are_unique() {
    let storage = KvStore::new().storage();
    storage.networks.persist(Network::named("Lab")).await.unwrap();
    let err = storage.networks.persist(Network::named("Lab")).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_of_one_name_admit_one() {
    let storage = KvStore::new().storage();
    let attempts: Vec<_> = (0..16)
        .map(|_| {
            let networks = storage.networks.clone();
            tokio::spawn(async move { networks.persist(Network::named("Lab")).await })
        })
        .collect();

    let mut created = 0;
    for attempt in attempts {
        match attempt.await.unwrap() {
            Ok(_) => created += 1,
            Err(err) => assert_eq!(err.kind, ErrorKind::Conflict),
        }
    }
    assert_eq!(created, 1);
}

#[tokio::test]
async fn test_rename_and_delete_release_network_name() {
    let storage = KvStore::new().storage();
    let mut lab = storage.networks.persist(Network::named("Lab")).await.unwrap();

    lab.name = "Workshop".into();
    let lab = storage.networks.persist(lab).await.unwrap();
    assert!(storage.networks.find_by_name("Lab").await.unwrap().is_none());
    assert_eq!(
        storage.networks.find_by_name("Workshop").await.unwrap().unwrap().id,
        lab.id
    );

    let other = storage.networks.persist(Network::named("Lab")).await.unwrap();
    assert_ne!(other.id, lab.id);

    assert!(storage.networks.delete(lab.id.unwrap()).await.unwrap());
    assert!(storage.networks.find_by_name("Workshop").await.unwrap().is_none());
    storage.networks.persist(Network::named("Workshop")).await.unwrap();
}

#[tokio::test]
async fn test_device_list_filters() {
    let storage = KvStore::new().storage();
    let lab = storage.networks.persist(Network::named("Lab")).await.unwrap();
    let class = storage
        .device_classes
        .persist(DeviceClass::new("Sensor", "1.0"))
        .await
        .unwrap();

    let mut a = Device::new("a", "k", "Alpha");
    a.network_id = lab.id;
    a.device_class_id = class.id;
    a.status = Some("online".into());
    storage.devices.persist(a).await.unwrap();
    storage.devices.persist(Device::new("b", "k", "Beta")).await.unwrap();

    let in_lab = storage
        .devices
        .list(
            &DeviceFilter {
                network_name: Some("Lab".into()),
                ..Default::default()
            },
            Sort::default(),
            Page::default(),
        )
        .await
        .unwrap();
    assert_eq!(in_lab.len(), 1);
    assert_eq!(in_lab[0].guid, "a");

    let by_class = storage
        .devices
        .list(
            &DeviceFilter {
                device_class_name: Some("Sensor".into()),
                status: Some("online".into()),
                ..Default::default()
            },
            Sort::asc(DeviceSortField::Name),
            Page::default(),
        )
        .await
        .unwrap();
    assert_eq!(by_class.len(), 1);

    let none = storage
        .devices
        .list(
            &DeviceFilter {
                network_name: Some("Nowhere".into()),
                ..Default::default()
            },
            Sort::default(),
            Page::default(),
        )
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_device_class_lookup_and_equipment() {
    let storage = KvStore::new().storage();
    let mut class = DeviceClass::new("Sensor", "2.0");
    class.equipment.push(Equipment {
        name: "Thermometer".into(),
        code: "temp".into(),
        equipment_type: "sensor".into(),
        data: None,
    });
    storage.device_classes.persist(class).await.unwrap();

    let found = storage
        .device_classes
        .find_by_name_and_version("Sensor", "2.0")
        .await
        .unwrap()
        .unwrap();
    assert!(found.equipment_by_code("temp").is_some());
    assert!(
        storage
            .device_classes
            .find_by_name_and_version("Sensor", "1.0")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_newer_than_is_strict_and_ordered() {
    let storage = KvStore::new().storage();
    let base = Utc::now();

    for (offset, name) in [(3, "third"), (1, "first"), (2, "second"), (0, "at-base")] {
        let mut command = Command::new("guid-1", name);
        command.timestamp = base + Duration::seconds(offset);
        storage.commands.persist(command).await.unwrap();
    }
    let mut other = Command::new("guid-2", "elsewhere");
    other.timestamp = base + Duration::seconds(5);
    storage.commands.persist(other).await.unwrap();

    let newer = storage.commands.newer_than("guid-1", base).await.unwrap();
    let names: Vec<_> = newer.iter().map(|c| c.command.as_str()).collect();
    assert_eq!(names, vec!["first", "second", "third"]);

    let mut notification = Notification::new("guid-1", "temperature");
    notification.timestamp = base + Duration::seconds(1);
    storage.notifications.persist(notification).await.unwrap();
    assert_eq!(storage.notifications.newer_than("guid-1", base).await.unwrap().len(), 1);
    assert!(
        storage
            .notifications
            .newer_than("guid-1", base + Duration::seconds(1))
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_user_network_grants() {
    let storage = KvStore::new().storage();
    let user = storage.users.persist(User::new("alice", UserRole::Client)).await.unwrap();
    let user_id = user.id.unwrap();
    let network = storage.networks.persist(Network::named("Lab")).await.unwrap();
    let network_id = network.id.unwrap();

    assert!(storage.users.networks_for_user(user_id).await.unwrap().is_empty());
    storage.users.grant_network(user_id, network_id).await.unwrap();
    storage.users.grant_network(user_id, network_id).await.unwrap();
    assert_eq!(
        storage.users.networks_for_user(user_id).await.unwrap(),
        [network_id].into_iter().collect()
    );

    storage.networks.delete(network_id).await.unwrap();
    assert!(storage.users.networks_for_user(user_id).await.unwrap().is_empty());
}
