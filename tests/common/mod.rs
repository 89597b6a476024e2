#![allow(dead_code)]

use chrono::NaiveDate;
use lottery_results::models::{
    CreateDrawRequest, CreatePlanRequest, CreatePrizeRequest, CreateResultRequest, DrawRef,
    DrawResponse, PlanResponse,
};
use lottery_results::services::{
    DrawService, PlanService, PrizeService, PublicService, ResultService, WinningNumbersPolicy,
};
use lottery_results::store::{MemoryStore, Store};

/// 基于同一存储组装的全部服务 (默认内存存储)
pub struct Lottery<S = MemoryStore> {
    pub store: S,
    pub plans: PlanService<S>,
    pub prizes: PrizeService<S>,
    pub draws: DrawService<S>,
    pub results: ResultService<S>,
    pub public: PublicService<S>,
}

impl Lottery<MemoryStore> {
    pub fn new() -> Self {
        Self::with_policy(WinningNumbersPolicy::default())
    }

    pub fn with_policy(policy: WinningNumbersPolicy) -> Self {
        Self::over(MemoryStore::new(), policy)
    }
}

impl<S: Store> Lottery<S> {
    pub fn over(store: S, policy: WinningNumbersPolicy) -> Self {
        Self {
            plans: PlanService::new(store.clone()),
            prizes: PrizeService::new(store.clone()),
            draws: DrawService::new(store.clone()),
            results: ResultService::new(store.clone(), policy),
            public: PublicService::new(store.clone()),
            store,
        }
    }

    /// 计划 "Clásica"：MAYOR (4 位) 与 SECO 36 (4 位)
    pub async fn clasica(&self) -> PlanResponse {
        self.plans
            .create_plan(CreatePlanRequest {
                name: "Clásica".into(),
                description: Some("Plan de premios semanal".into()),
                prizes: vec![
                    prize("MAYOR", "$2.000 millones", 4),
                    prize("SECO 36", "$20 millones", 4),
                ],
            })
            .await
            .unwrap()
    }

    pub async fn draw(&self, plan_id: i64, draw_number: &str) -> DrawResponse {
        self.draws
            .create_draw(CreateDrawRequest {
                draw_number: draw_number.into(),
                date: date(2025, 3, 14),
                plan_id,
            })
            .await
            .unwrap()
    }
}

pub fn prize(title: &str, display_value: &str, ball_count: i32) -> CreatePrizeRequest {
    CreatePrizeRequest {
        title: title.into(),
        display_value: display_value.into(),
        ball_count,
    }
}

pub fn result_by_number(draw_number: &str, title: &str, numbers: &str) -> CreateResultRequest {
    CreateResultRequest {
        draw: DrawRef::Number(draw_number.into()),
        prize_title: title.into(),
        winning_numbers: numbers.into(),
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
