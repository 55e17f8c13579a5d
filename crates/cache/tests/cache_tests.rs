use bourse_cache::mem::MemCache;
use bourse_core::cache::port::{Cache, CacheExt};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct CachedCloses {
    symbol: String,
    closes: Vec<f64>,
}

#[tokio::test]
async fn test_mem_cache_raw_ops() {
    let cache = MemCache::new();
    let key = "p:SP5.PA:5y";
    let value = vec![1, 2, 3, 4];

    // 测试存取
    cache.set_raw(key, value.clone()).await.unwrap();
    let result = cache.get_raw(key).await.unwrap().unwrap();
    assert_eq!(result, value);

    // 测试删除
    cache.del(key).await.unwrap();
    let result = cache.get_raw(key).await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_mem_cache_typed_ops() {
    let cache = MemCache::new();
    let key = "p:CW8.PA:2y";
    let item = CachedCloses {
        symbol: "CW8.PA".to_string(),
        closes: vec![451.2, 455.0, 449.8],
    };

    cache.set(key, &item).await.unwrap();

    let result: CachedCloses = cache.get(key).await.unwrap().unwrap();
    assert_eq!(result, item);
}

#[tokio::test]
async fn test_mem_cache_clear_reports_count() {
    let cache = MemCache::new();
    cache.set_raw("d:TTE.PA", vec![1]).await.unwrap();
    cache.set_raw("d:ORA.PA", vec![2]).await.unwrap();
    assert_eq!(cache.len(), 2);

    assert_eq!(cache.clear().await.unwrap(), 2);
    assert!(cache.is_empty());
    assert!(cache.get_raw("d:TTE.PA").await.unwrap().is_none());
}

#[tokio::test]
async fn test_mem_cache_typed_get_rejects_wrong_shape() {
    let cache = MemCache::new();
    cache.set("p:X:1y", &vec![1, 2, 3]).await.unwrap();
    let result = cache.get::<CachedCloses>("p:X:1y").await;
    assert!(result.is_err());
}
