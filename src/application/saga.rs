// ワークフローのステップと補償の宣言
//
// 各ワークフローは名前付きステップの列で、ステップごとに
// 「後続ステップが失敗したときに取り消す処理」を宣言する。
// 補償を宣言しているのはグループ作成のみで、ユーザー作成と
// グループ参加は失敗時も作成済みのデータをそのまま残す。

use std::fmt::Display;
use tracing::{debug, error};

/// 補償アクション
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compensation {
    /// 取り消さない
    None,
    /// 作成したグループを削除する
    DeleteGroup,
}

/// ワークフローの1ステップ
pub trait SagaStep: Copy + std::fmt::Debug {
    /// ログ用のステップ名
    fn name(&self) -> &'static str;

    /// このステップ完了後に後続が失敗した場合の補償
    fn compensation(&self) -> Compensation;
}

/// ユーザー作成ワークフローのステップ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisioningStep {
    InsertUser,
    CreateBillingCustomer,
    LinkBillingCustomer,
}

impl SagaStep for ProvisioningStep {
    fn name(&self) -> &'static str {
        match self {
            ProvisioningStep::InsertUser => "insert_user",
            ProvisioningStep::CreateBillingCustomer => "create_billing_customer",
            ProvisioningStep::LinkBillingCustomer => "link_billing_customer",
        }
    }

    fn compensation(&self) -> Compensation {
        // 課金顧客の作成・リンクに失敗してもユーザーは削除しない
        Compensation::None
    }
}

/// グループ作成ワークフローのステップ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupCreationStep {
    InsertGroup,
    AddAdminMember,
}

impl SagaStep for GroupCreationStep {
    fn name(&self) -> &'static str {
        match self {
            GroupCreationStep::InsertGroup => "insert_group",
            GroupCreationStep::AddAdminMember => "add_admin_member",
        }
    }

    fn compensation(&self) -> Compensation {
        match self {
            GroupCreationStep::InsertGroup => Compensation::DeleteGroup,
            GroupCreationStep::AddAdminMember => Compensation::None,
        }
    }
}

/// グループ参加ワークフローのステップ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddMemberStep {
    InsertMember,
}

impl SagaStep for AddMemberStep {
    fn name(&self) -> &'static str {
        "insert_member"
    }

    fn compensation(&self) -> Compensation {
        Compensation::None
    }
}

/// 完了済みステップの記録
#[derive(Debug)]
pub struct SagaLog<S: SagaStep> {
    workflow: &'static str,
    completed: Vec<S>,
}

impl<S: SagaStep> SagaLog<S> {
    pub fn new(workflow: &'static str) -> Self {
        Self {
            workflow,
            completed: Vec::new(),
        }
    }

    /// ステップの完了を記録
    pub fn complete(&mut self, step: S) {
        debug!(workflow = self.workflow, step = step.name(), "ステップ完了");
        self.completed.push(step);
    }

    /// ステップの失敗を記録し、実行すべき補償を新しい順に返す
    pub fn fail(&self, step: S, cause: &dyn Display) -> Vec<Compensation> {
        let compensations: Vec<Compensation> = self
            .completed
            .iter()
            .rev()
            .map(S::compensation)
            .filter(|c| *c != Compensation::None)
            .collect();

        let completed: Vec<&'static str> = self.completed.iter().map(S::name).collect();
        error!(
            workflow = self.workflow,
            failed_step = step.name(),
            completed_steps = ?completed,
            compensations = ?compensations,
            error = %cause,
            "ステップ失敗"
        );

        compensations
    }
}
