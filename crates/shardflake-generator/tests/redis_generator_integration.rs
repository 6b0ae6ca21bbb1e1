use shardflake_generator::{
    parse, Decoded, FixedShard, GeneratorSettings, RedisSequenceStore, ShardFlake,
};
use shardflake_core::SystemClock;
use shardflake_test_infra::redis::RedisMaster;

async fn start_redis() -> (RedisMaster, RedisSequenceStore) {
    let redis = RedisMaster::new()
        .await
        .expect("Failed to start Redis master");
    let conn = redis
        .connection()
        .await
        .expect("Failed to get Redis connection");
    (redis, RedisSequenceStore::new(conn))
}

#[tokio::test]
async fn test_pinned_shard_round_trips_and_cycles_eight_times() {
    let (_redis, store) = start_redis().await;
    let gen = ShardFlake::with_parts(
        store,
        FixedShard(0),
        SystemClock,
        GeneratorSettings::default(),
    )
    .unwrap();

    gen.reset_seq(1, 0).await.unwrap();

    let mut seqs = Vec::with_capacity(1024);
    for _ in 0..1024 {
        let result = gen.generate(1).await.unwrap();
        let decoded = parse(&result.uuid).unwrap();
        assert_eq!(
            decoded,
            Decoded {
                ty: 1,
                shard: 0,
                sec: result.sec,
                msec: result.msec,
                seq: result.seq,
            }
        );
        seqs.push(result.seq);
    }

    let expected: Vec<u8> = (0..=127).cycle().take(1024).collect();
    assert_eq!(seqs, expected);
}

#[tokio::test]
async fn test_random_shards_round_trip() {
    let (_redis, store) = start_redis().await;
    let gen = ShardFlake::new(store, GeneratorSettings::default()).unwrap();

    for ty in [0, 7, 1023] {
        let result = gen.generate(ty).await.unwrap();
        let decoded = gen.parse(&result.uuid).unwrap();
        assert_eq!(decoded.ty as u32, ty);
        assert_eq!(decoded.shard, result.shard);
        assert_eq!(decoded.seq, result.seq);
    }

    assert!(gen.generate(1024).await.is_err());
}
