// ==========================================
// Repository 层集成测试
// ==========================================
// 测试目标: 验证记录存储契约 (插入/查重/排序/归属隔离)
// 与补充台账仓储 (竞争对手报价/生产工单)
// ==========================================

mod test_helpers;

use conductor_calc::domain::calculation::{
    BareResult, CalcResult, CalculationInputs, CalculationRecord, CalculationSnapshot,
};
use conductor_calc::domain::competitor::CompetitorRate;
use conductor_calc::domain::instruction::{InstructionStatus, WorkInstruction};
use conductor_calc::domain::types::{CalcMode, Material, SaveMode, Shape};
use conductor_calc::repository::{
    CalculationRecordRepository, CompetitorRateRepository, RecordStore, RepositoryError,
    WorkInstructionRepository,
};

fn snapshot(width: f64) -> CalculationSnapshot {
    CalculationSnapshot {
        mode: CalcMode::Bare,
        material: Material::Aluminium,
        shape: Shape::Strip,
        preset_name: None,
        voltage_label: None,
        inputs: CalculationInputs {
            width,
            thickness: 2.0,
            length_m: 1000.0,
            ..Default::default()
        },
        result: CalcResult::Bare(BareResult {
            bare_area: width * 2.0,
            weight_kg: width * 2.0 * 2.709,
        }),
    }
}

#[tokio::test]
async fn test_manual_insert_always_creates_new_record() {
    let (_tmp, db_path) = test_helpers::create_test_db().expect("Failed to create test db");
    let repo = CalculationRecordRepository::new(&db_path).expect("repo");

    let snap = snapshot(10.0);
    let r1 = CalculationRecord::from_snapshot(&snap, "u1", "fp-same", SaveMode::Manual);
    let r2 = CalculationRecord::from_snapshot(&snap, "u1", "fp-same", SaveMode::Manual);

    let id1 = repo.insert(&r1).await.expect("首次插入");
    let id2 = repo.insert(&r2).await.expect("重复手动插入也应成功");
    assert_ne!(id1, id2, "MANUAL 记录不去重");

    let count = test_helpers::count_records(&db_path, Some("MANUAL")).unwrap();
    assert_eq!(count, 2);
}

#[tokio::test]
async fn test_auto_insert_is_idempotent_per_owner_fingerprint() {
    let (_tmp, db_path) = test_helpers::create_test_db().expect("Failed to create test db");
    let repo = CalculationRecordRepository::new(&db_path).expect("repo");

    let snap = snapshot(10.0);
    let r1 = CalculationRecord::from_snapshot(&snap, "u1", "fp-auto", SaveMode::Auto);
    let r2 = CalculationRecord::from_snapshot(&snap, "u1", "fp-auto", SaveMode::Auto);

    let id1 = repo.insert(&r1).await.expect("首次插入");
    // 唯一索引命中 → 返回既有记录 id，不报错
    let id2 = repo.insert(&r2).await.expect("冲突应退化为幂等插入");
    assert_eq!(id1, id2);

    assert_eq!(test_helpers::count_records(&db_path, Some("AUTO")).unwrap(), 1);

    // 不同归属者不受影响
    let r3 = CalculationRecord::from_snapshot(&snap, "u2", "fp-auto", SaveMode::Auto);
    let id3 = repo.insert(&r3).await.expect("另一归属者插入");
    assert_ne!(id1, id3);
    assert_eq!(test_helpers::count_records(&db_path, Some("AUTO")).unwrap(), 2);
}

#[tokio::test]
async fn test_find_by_fingerprint_scoped_to_owner() {
    let (_tmp, db_path) = test_helpers::create_test_db().expect("Failed to create test db");
    let repo = CalculationRecordRepository::new(&db_path).expect("repo");

    let snap = snapshot(12.0);
    let record = CalculationRecord::from_snapshot(&snap, "owner-a", "fp-x", SaveMode::Auto);
    repo.insert(&record).await.unwrap();

    let hit = repo.find_by_fingerprint("owner-a", "fp-x").await.unwrap();
    assert!(hit.is_some());
    let found = hit.unwrap();
    assert_eq!(found.record_id, record.record_id);
    assert_eq!(found.inputs.width, 12.0);
    assert_eq!(found.result.bare_area(), 24.0);

    // 其他归属者查不到
    assert!(repo
        .find_by_fingerprint("owner-b", "fp-x")
        .await
        .unwrap()
        .is_none());
    assert!(repo
        .find_by_fingerprint("owner-a", "fp-other")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_listing_is_newest_first_and_owner_scoped() {
    let (_tmp, db_path) = test_helpers::create_test_db().expect("Failed to create test db");
    let repo = CalculationRecordRepository::new(&db_path).expect("repo");

    for (i, owner) in [(1, "u1"), (2, "u1"), (3, "u2")] {
        let record = CalculationRecord::from_snapshot(
            &snapshot(i as f64),
            owner,
            &format!("fp-{}", i),
            SaveMode::Auto,
        );
        repo.insert(&record).await.unwrap();
    }

    let u1_records = repo.list_by_owner("u1").await.unwrap();
    assert_eq!(u1_records.len(), 2);
    // 新→旧
    assert_eq!(u1_records[0].fingerprint, "fp-2");
    assert_eq!(u1_records[1].fingerprint, "fp-1");

    let all = repo.list_all().await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].fingerprint, "fp-3");
}

#[tokio::test]
async fn test_snapshot_roundtrip_through_store() {
    let (_tmp, db_path) = test_helpers::create_test_db().expect("Failed to create test db");
    let repo = CalculationRecordRepository::new(&db_path).expect("repo");

    let mut snap = snapshot(10.0);
    snap.mode = CalcMode::Insulated;
    snap.preset_name = Some("Poly + Dfg 225".to_string());
    snap.voltage_label = Some("8 kV".to_string());

    let record = CalculationRecord::from_snapshot(&snap, "u1", "fp-rt", SaveMode::Manual);
    repo.insert(&record).await.unwrap();

    let loaded = repo
        .find_by_fingerprint("u1", "fp-rt")
        .await
        .unwrap()
        .expect("应能读回");
    assert_eq!(loaded.mode, CalcMode::Insulated);
    assert_eq!(loaded.preset_name.as_deref(), Some("Poly + Dfg 225"));
    assert_eq!(loaded.voltage_label.as_deref(), Some("8 kV"));
    assert_eq!(loaded.inputs, record.inputs);
    assert_eq!(loaded.result, record.result);
}

// ==========================================
// 竞争对手报价仓储
// ==========================================

#[test]
fn test_competitor_rate_repository() {
    let (_tmp, db_path) = test_helpers::create_test_db().expect("Failed to create test db");
    let repo = CompetitorRateRepository::new(&db_path).expect("repo");

    let cu = CompetitorRate::new("ACME Wires", Material::Copper, 960.0, 12.5, "2025-11-03", None);
    let alu = CompetitorRate::new(
        "Shakti Conductors",
        Material::Aluminium,
        248.0,
        6.0,
        "2025-11-04",
        Some("现场询价".to_string()),
    );
    repo.insert(&cu).unwrap();
    repo.insert(&alu).unwrap();

    let copper_rates = repo.list_by_material(Material::Copper).unwrap();
    assert_eq!(copper_rates.len(), 1);
    assert_eq!(copper_rates[0].effective_rate, 972.5);

    let all = repo.list_all().unwrap();
    assert_eq!(all.len(), 2);
    // 新→旧
    assert_eq!(all[0].competitor_name, "Shakti Conductors");
}

// ==========================================
// 生产工单仓储
// ==========================================

#[test]
fn test_work_instruction_lifecycle() {
    let (_tmp, db_path) = test_helpers::create_test_db().expect("Failed to create test db");
    let repo = WorkInstructionRepository::new(&db_path).expect("repo");

    let wi = WorkInstruction::new(
        "SO-1042",
        "Prakash Transformers",
        "10.0 x 2.0 mm",
        Material::Aluminium,
        "Dfg 225 yarn",
        500.0,
        256.0,
    );
    repo.insert(&wi).unwrap();

    let pending = repo.list_by_status(InstructionStatus::Pending).unwrap();
    assert_eq!(pending.len(), 1);

    let activated = repo
        .update_status(&wi.instruction_id, InstructionStatus::Active)
        .unwrap();
    assert_eq!(activated.status, InstructionStatus::Active);

    // 跳回 PENDING 属非法流转
    let err = repo
        .update_status(&wi.instruction_id, InstructionStatus::Pending)
        .unwrap_err();
    assert!(matches!(err, RepositoryError::InvalidStateTransition { .. }));

    repo.update_status(&wi.instruction_id, InstructionStatus::Completed)
        .unwrap();
    let completed = repo.list_by_status(InstructionStatus::Completed).unwrap();
    assert_eq!(completed.len(), 1);
    assert!(repo.list_by_status(InstructionStatus::Pending).unwrap().is_empty());

    // 不存在的工单
    let missing = repo.update_status("no-such-id", InstructionStatus::Active);
    assert!(matches!(missing, Err(RepositoryError::NotFound { .. })));
}
