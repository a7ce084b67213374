//! 预导入模块，方便使用

pub use super::lecture_materials::{
    ActiveModel as LectureMaterialActiveModel, Entity as LectureMaterials,
    Model as LectureMaterialModel,
};
pub use super::lectures::{
    ActiveModel as LectureActiveModel, Entity as Lectures, Model as LectureModel,
};
pub use super::roles::{ActiveModel as RoleActiveModel, Entity as Roles, Model as RoleModel};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
pub use super::users_roles::{
    ActiveModel as UserRoleActiveModel, Entity as UsersRoles, Model as UserRoleModel,
};
